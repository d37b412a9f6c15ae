use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum BillSplitError {
    #[error("Session {0} not found")]
    SessionNotFound(String),
    #[error("Member {0} not found")]
    MemberNotFound(i64),
    #[error("Expense {0} not found")]
    ExpenseNotFound(i64),
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Expense must have at least one participant")]
    EmptyParticipants,
    #[error("Custom split total {0} does not match amount {1}")]
    InvalidSplit(i64, i64),
    #[error("Member {0} is not part of this session")]
    UnknownParticipant(i64),
    #[error("Invalid member group: {0}")]
    InvalidGroup(String),
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
    #[error("Not connected to any session")]
    NotJoined,
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("Export error: {0}")]
    ExportError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("Cache error: {0}")]
    CacheError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}
