use crate::constants::MAX_ACTIVITY_LOG_ENTRIES;
use crate::core::errors::BillSplitError;
use crate::core::models::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Bounded activity log. Once `capacity` entries are held the oldest one is
/// dropped for each new entry.
#[derive(Clone)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<VecDeque<AppLog>>>,
    capacity: usize,
}

impl Default for InMemoryLogging {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ACTIVITY_LOG_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        InMemoryLogging {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        session_code: Option<&str>,
    ) -> Result<(), BillSplitError> {
        let details = match details {
            serde_json::Value::Object(details) => details,
            other => {
                return Err(BillSplitError::LoggingError(format!(
                    "Details of {} must be an object, got {}",
                    action, other
                )));
            }
        };
        debug!("[{}] {} {:?}", session_code.unwrap_or("-"), action, details);

        let mut entries = self.entries.write().await;
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            session_code: session_code.map(String::from),
            details: details.into_iter().collect(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, BillSplitError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().cloned().collect())
    }

    async fn get_session_logs(&self, session_code: &str) -> Result<Vec<AppLog>, BillSplitError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|l| l.session_code.as_deref() == Some(session_code))
            .cloned()
            .collect())
    }
}
