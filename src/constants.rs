pub const SESSION_CREATED: &str = "SESSION_CREATED";
pub const MEMBER_ADDED: &str = "MEMBER_ADDED";
pub const MEMBER_UPDATED: &str = "MEMBER_UPDATED";
pub const MEMBER_DELETED: &str = "MEMBER_DELETED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const EXPENSE_UPDATED: &str = "EXPENSE_UPDATED";
pub const EXPENSE_DELETED: &str = "EXPENSE_DELETED";
pub const GROUPING_UPDATED: &str = "GROUPING_UPDATED";
pub const SESSION_EXPORTED: &str = "SESSION_EXPORTED";

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_AMOUNT: i64 = 1_000_000_000;
pub const MAX_SLOTS: u32 = 100;

pub const MAX_ACTIVITY_LOG_ENTRIES: usize = 10_000;
