use crate::core::calculations::SessionSnapshot;
use crate::core::errors::BillSplitError;
use crate::infrastructure::cache::Cache;
use crate::infrastructure::cache::cache_keys::session_snapshot_key;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryCache {
    cache: Arc<RwLock<HashMap<String, (SessionSnapshot, chrono::DateTime<chrono::Utc>)>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_snapshot(&self, session_code: &str) -> Result<Option<SessionSnapshot>, BillSplitError> {
        let key = session_snapshot_key(session_code);
        {
            let cache = self.cache.read().await;
            match cache.get(&key) {
                Some((snapshot, expiry)) if *expiry > chrono::Utc::now() => return Ok(Some(snapshot.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired
        self.cache.write().await.remove(&key);
        Ok(None)
    }

    async fn save_snapshot(
        &self,
        session_code: &str,
        snapshot: &SessionSnapshot,
        ttl: std::time::Duration,
    ) -> Result<(), BillSplitError> {
        let expiry = chrono::Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| BillSplitError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        let mut cache = self.cache.write().await;
        cache.insert(session_snapshot_key(session_code), (snapshot.clone(), expiry));
        Ok(())
    }

    async fn invalidate_snapshot(&self, session_code: &str) -> Result<(), BillSplitError> {
        let mut cache = self.cache.write().await;
        cache.remove(&session_snapshot_key(session_code));
        Ok(())
    }
}
