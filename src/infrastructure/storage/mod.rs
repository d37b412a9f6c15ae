use crate::core::errors::BillSplitError;
use crate::core::models::{Expense, ExpenseUpdate, Member, MemberId, NewExpense, NewMember, Session};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_session(&self, code: String) -> Result<Session, BillSplitError>;
    async fn get_session_by_code(&self, code: &str) -> Result<Option<Session>, BillSplitError>;
    async fn save_session(&self, session: Session) -> Result<(), BillSplitError>;

    async fn get_members(&self, session_id: i64) -> Result<Vec<Member>, BillSplitError>;
    async fn get_member(&self, member_id: MemberId) -> Result<Option<Member>, BillSplitError>;
    async fn create_member(&self, session_id: i64, member: NewMember) -> Result<Member, BillSplitError>;
    async fn save_member(&self, member: Member) -> Result<(), BillSplitError>;
    /// Removes the member, the expenses it paid, and its participation in
    /// the rest. A custom split it took part in reverts to a slot split.
    /// Returns false when the member does not exist.
    async fn delete_member(&self, member_id: MemberId) -> Result<bool, BillSplitError>;

    async fn get_expenses(&self, session_id: i64) -> Result<Vec<Expense>, BillSplitError>;
    async fn get_expense(&self, expense_id: i64) -> Result<Option<Expense>, BillSplitError>;
    async fn create_expense(&self, session_id: i64, expense: NewExpense) -> Result<Expense, BillSplitError>;
    async fn update_expense(&self, expense_id: i64, update: ExpenseUpdate) -> Result<Option<Expense>, BillSplitError>;
    async fn delete_expense(&self, expense_id: i64) -> Result<bool, BillSplitError>;
}

/// Lets the binary pick a backend at runtime behind one service type.
#[async_trait]
impl Storage for Arc<dyn Storage> {
    async fn create_session(&self, code: String) -> Result<Session, BillSplitError> {
        (**self).create_session(code).await
    }

    async fn get_session_by_code(&self, code: &str) -> Result<Option<Session>, BillSplitError> {
        (**self).get_session_by_code(code).await
    }

    async fn save_session(&self, session: Session) -> Result<(), BillSplitError> {
        (**self).save_session(session).await
    }

    async fn get_members(&self, session_id: i64) -> Result<Vec<Member>, BillSplitError> {
        (**self).get_members(session_id).await
    }

    async fn get_member(&self, member_id: MemberId) -> Result<Option<Member>, BillSplitError> {
        (**self).get_member(member_id).await
    }

    async fn create_member(&self, session_id: i64, member: NewMember) -> Result<Member, BillSplitError> {
        (**self).create_member(session_id, member).await
    }

    async fn save_member(&self, member: Member) -> Result<(), BillSplitError> {
        (**self).save_member(member).await
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<bool, BillSplitError> {
        (**self).delete_member(member_id).await
    }

    async fn get_expenses(&self, session_id: i64) -> Result<Vec<Expense>, BillSplitError> {
        (**self).get_expenses(session_id).await
    }

    async fn get_expense(&self, expense_id: i64) -> Result<Option<Expense>, BillSplitError> {
        (**self).get_expense(expense_id).await
    }

    async fn create_expense(&self, session_id: i64, expense: NewExpense) -> Result<Expense, BillSplitError> {
        (**self).create_expense(session_id, expense).await
    }

    async fn update_expense(&self, expense_id: i64, update: ExpenseUpdate) -> Result<Option<Expense>, BillSplitError> {
        (**self).update_expense(expense_id, update).await
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<bool, BillSplitError> {
        (**self).delete_expense(expense_id).await
    }
}

pub mod data;
pub mod file;
pub mod in_memory;
