pub mod cache_keys;
pub mod in_memory;

use crate::core::calculations::SessionSnapshot;
use crate::core::errors::BillSplitError;
use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_snapshot(&self, session_code: &str) -> Result<Option<SessionSnapshot>, BillSplitError>;
    async fn save_snapshot(
        &self,
        session_code: &str,
        snapshot: &SessionSnapshot,
        ttl: std::time::Duration,
    ) -> Result<(), BillSplitError>;
    async fn invalidate_snapshot(&self, session_code: &str) -> Result<(), BillSplitError>;
}
