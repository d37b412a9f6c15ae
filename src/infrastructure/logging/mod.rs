pub mod in_memory;

use crate::core::errors::BillSplitError;
use crate::core::models::AppLog;
use async_trait::async_trait;

/// Activity log of data edits made in sessions, oldest entry first.
#[async_trait]
pub trait LoggingService: Send + Sync {
    /// Records `action`; `details` must be a JSON object.
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        session_code: Option<&str>,
    ) -> Result<(), BillSplitError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, BillSplitError>;
    async fn get_session_logs(&self, session_code: &str) -> Result<Vec<AppLog>, BillSplitError>;
}
