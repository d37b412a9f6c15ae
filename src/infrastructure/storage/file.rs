use super::data::StoreData;
use crate::core::errors::BillSplitError;
use crate::core::models::{Expense, ExpenseUpdate, Member, MemberId, NewExpense, NewMember, Session};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps the data set in memory and rewrites it as pretty JSON after every
/// mutation. A mutation only becomes visible once its write succeeded.
#[derive(Clone)]
pub struct FileStorage {
    path: PathBuf,
    data: Arc<RwLock<StoreData>>,
}

impl FileStorage {
    /// Loads `path` if it exists, otherwise starts empty and creates it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, BillSplitError> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| BillSplitError::StorageError(format!("Failed to create {}: {}", dir.display(), e)))?;
        }

        let data = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                let data: StoreData = serde_json::from_str(&raw)
                    .map_err(|e| BillSplitError::StorageError(format!("Corrupt data file {}: {}", path.display(), e)))?;
                info!(
                    "Loaded {} sessions, {} members, {} expenses from {}",
                    data.sessions.len(),
                    data.members.len(),
                    data.expenses.len(),
                    path.display()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Data file {} not found, starting empty", path.display());
                StoreData::default()
            }
            Err(e) => {
                return Err(BillSplitError::StorageError(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let storage = FileStorage {
            path,
            data: Arc::new(RwLock::new(data)),
        };
        storage.persist(&*storage.data.read().await).await?;
        Ok(storage)
    }

    /// Writes a sibling temp file and renames it over the data file, so a
    /// crash mid-write leaves the previous version intact.
    async fn persist(&self, data: &StoreData) -> Result<(), BillSplitError> {
        let raw = serde_json::to_string_pretty(data)
            .map_err(|e| BillSplitError::StorageError(format!("Failed to serialize data: {}", e)))?;
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        tokio::fs::write(&staging, raw)
            .await
            .map_err(|e| BillSplitError::StorageError(format!("Failed to write {}: {}", staging.display(), e)))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| BillSplitError::StorageError(format!("Failed to replace {}: {}", self.path.display(), e)))
    }

    /// Applies `change` to a copy and swaps it in once it is on disk.
    async fn commit<T>(&self, change: impl FnOnce(&mut StoreData) -> T) -> Result<T, BillSplitError> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let result = change(&mut next);
        self.persist(&next).await?;
        *data = next;
        Ok(result)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn create_session(&self, code: String) -> Result<Session, BillSplitError> {
        self.commit(|data| data.create_session(code)).await
    }

    async fn get_session_by_code(&self, code: &str) -> Result<Option<Session>, BillSplitError> {
        let data = self.data.read().await;
        Ok(data.session_by_code(code))
    }

    async fn save_session(&self, session: Session) -> Result<(), BillSplitError> {
        self.commit(|data| data.save_session(session)).await
    }

    async fn get_members(&self, session_id: i64) -> Result<Vec<Member>, BillSplitError> {
        let data = self.data.read().await;
        Ok(data.members(session_id))
    }

    async fn get_member(&self, member_id: MemberId) -> Result<Option<Member>, BillSplitError> {
        let data = self.data.read().await;
        Ok(data.member(member_id))
    }

    async fn create_member(&self, session_id: i64, member: NewMember) -> Result<Member, BillSplitError> {
        self.commit(|data| data.create_member(session_id, member)).await
    }

    async fn save_member(&self, member: Member) -> Result<(), BillSplitError> {
        self.commit(|data| data.save_member(member)).await
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<bool, BillSplitError> {
        if self.data.read().await.member(member_id).is_none() {
            return Ok(false);
        }
        self.commit(|data| data.delete_member(member_id)).await
    }

    async fn get_expenses(&self, session_id: i64) -> Result<Vec<Expense>, BillSplitError> {
        let data = self.data.read().await;
        Ok(data.expenses(session_id))
    }

    async fn get_expense(&self, expense_id: i64) -> Result<Option<Expense>, BillSplitError> {
        let data = self.data.read().await;
        Ok(data.expense(expense_id))
    }

    async fn create_expense(&self, session_id: i64, expense: NewExpense) -> Result<Expense, BillSplitError> {
        self.commit(|data| data.create_expense(session_id, expense)).await
    }

    async fn update_expense(&self, expense_id: i64, update: ExpenseUpdate) -> Result<Option<Expense>, BillSplitError> {
        if self.data.read().await.expense(expense_id).is_none() {
            return Ok(None);
        }
        self.commit(|data| data.update_expense(expense_id, update)).await
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<bool, BillSplitError> {
        if self.data.read().await.expense(expense_id).is_none() {
            return Ok(false);
        }
        self.commit(|data| data.delete_expense(expense_id)).await
    }
}
