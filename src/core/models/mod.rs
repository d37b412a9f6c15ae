pub mod audit;
pub mod balance;
pub mod expense;
pub mod group;
pub mod member;
pub mod session;
pub mod summary;

pub use audit::AppLog;
pub use balance::{MemberBalance, Settlement};
pub use expense::{Expense, ExpenseUpdate, NewExpense};
pub use group::MemberGroup;
pub use member::{DEFAULT_SLOTS, Member, MemberId, NewMember};
pub use session::Session;
pub use summary::{CategoryTotal, ExpenseSummary};
