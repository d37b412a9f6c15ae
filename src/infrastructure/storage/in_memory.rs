use super::data::StoreData;
use crate::core::errors::BillSplitError;
use crate::core::models::{Expense, ExpenseUpdate, Member, MemberId, NewExpense, NewMember, Session};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            data: Arc::new(RwLock::new(StoreData::default())),
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_session(&self, code: String) -> Result<Session, BillSplitError> {
        let mut data = self.data.write().await;
        Ok(data.create_session(code))
    }

    async fn get_session_by_code(&self, code: &str) -> Result<Option<Session>, BillSplitError> {
        let data = self.data.read().await;
        Ok(data.session_by_code(code))
    }

    async fn save_session(&self, session: Session) -> Result<(), BillSplitError> {
        let mut data = self.data.write().await;
        data.save_session(session);
        Ok(())
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
        let mut data = self.data.write().await;
        Ok(data.create_member(session_id, member))
    }

    async fn save_member(&self, member: Member) -> Result<(), BillSplitError> {
        let mut data = self.data.write().await;
        data.save_member(member);
        Ok(())
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<bool, BillSplitError> {
        let mut data = self.data.write().await;
        Ok(data.delete_member(member_id))
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
        let mut data = self.data.write().await;
        Ok(data.create_expense(session_id, expense))
    }

    async fn update_expense(&self, expense_id: i64, update: ExpenseUpdate) -> Result<Option<Expense>, BillSplitError> {
        let mut data = self.data.write().await;
        Ok(data.update_expense(expense_id, update))
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<bool, BillSplitError> {
        let mut data = self.data.write().await;
        Ok(data.delete_expense(expense_id))
    }
}
