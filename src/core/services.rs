use crate::constants::{
    EXPENSE_ADDED, EXPENSE_DELETED, EXPENSE_UPDATED, GROUPING_UPDATED, MAX_AMOUNT, MAX_NAME_LENGTH, MAX_SLOTS,
    MEMBER_ADDED, MEMBER_DELETED, MEMBER_UPDATED, SESSION_CREATED, SESSION_EXPORTED,
};
use crate::core::calculations::{SessionSnapshot, recompute};
use crate::core::colors::{ColorCache, contrast_text_color};
use crate::core::errors::{BillSplitError, FieldError};
use crate::core::export::{ExportFormat, ExportInput, export};
use crate::core::messages::{MemberView, ServerMessage, SessionView};
use crate::core::models::{
    AppLog, Expense, ExpenseUpdate, Member, MemberGroup, MemberId, NewExpense, NewMember, Session,
};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::hub::SessionHub;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use log::{debug, info, warn};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, broadcast};
use uuid::Uuid;

/// Session host: validates edits, stores them, recomputes the derived
/// snapshot and pushes changes to connected clients.
pub struct SessionService<L: LoggingService, S: Storage, C: Cache> {
    storage: S,
    logging: L,
    cache: C,
    hub: SessionHub,
    colors: RwLock<HashMap<String, ColorCache>>,
    // Held across mutate + recompute so a snapshot never sees half an edit.
    mutation_lock: Mutex<()>,
    snapshot_ttl: Duration,
    code_length: usize,
}

impl<L: LoggingService, S: Storage, C: Cache> SessionService<L, S, C> {
    pub fn new(storage: S, logging: L, cache: C) -> Self {
        SessionService {
            storage,
            logging,
            cache,
            hub: SessionHub::new(),
            colors: RwLock::new(HashMap::new()),
            mutation_lock: Mutex::new(()),
            snapshot_ttl: Duration::from_secs(3600),
            code_length: 6,
        }
    }

    pub fn with_snapshot_ttl(mut self, ttl: Duration) -> Self {
        self.snapshot_ttl = ttl;
        self
    }

    pub fn with_code_length(mut self, length: usize) -> Self {
        self.code_length = length.clamp(4, 32);
        self
    }

    // VALIDATION

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), BillSplitError> {
        if value.trim().is_empty() {
            return Err(BillSplitError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.chars().count() > max_length {
            return Err(BillSplitError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(BillSplitError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} contains invalid characters", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: i64) -> Result<(), BillSplitError> {
        if amount <= 0 {
            return Err(BillSplitError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be greater than 0".to_string(),
                },
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(BillSplitError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Amount Too Large".to_string(),
                    description: format!("Amount cannot exceed {}", MAX_AMOUNT),
                },
            ));
        }
        Ok(())
    }

    fn validate_slots(&self, slots: u32) -> Result<(), BillSplitError> {
        if !(1..=MAX_SLOTS).contains(&slots) {
            return Err(BillSplitError::InvalidInput(
                "slots".to_string(),
                FieldError {
                    field: "slots".to_string(),
                    title: "Invalid Slots".to_string(),
                    description: format!("Slots must be between 1 and {}", MAX_SLOTS),
                },
            ));
        }
        Ok(())
    }

    fn validate_expense(&self, expense: &NewExpense, members: &[Member]) -> Result<(), BillSplitError> {
        self.validate_string_input("name", &expense.name, MAX_NAME_LENGTH)?;
        self.validate_amount_input("amount", expense.amount)?;

        if expense.participants.is_empty() {
            return Err(BillSplitError::EmptyParticipants);
        }

        let known: HashSet<MemberId> = members.iter().map(|m| m.id).collect();
        if !known.contains(&expense.payer_id) {
            return Err(BillSplitError::UnknownParticipant(expense.payer_id));
        }
        if let Some(&unknown) = expense.participants.iter().find(|p| !known.contains(*p)) {
            return Err(BillSplitError::UnknownParticipant(unknown));
        }

        if expense.is_custom_split {
            if let Some(&outsider) = expense
                .custom_amounts
                .keys()
                .find(|id| !expense.participants.contains(*id))
            {
                return Err(BillSplitError::UnknownParticipant(outsider));
            }
            if expense.custom_amounts.values().any(|&a| a < 0) {
                return Err(BillSplitError::InvalidInput(
                    "customAmounts".to_string(),
                    FieldError {
                        field: "customAmounts".to_string(),
                        title: "Invalid Amount".to_string(),
                        description: "Custom amounts cannot be negative".to_string(),
                    },
                ));
            }
            let total: i64 = expense
                .participants
                .iter()
                .map(|p| expense.custom_amounts.get(p).copied().unwrap_or(0))
                .sum();
            if total != expense.amount {
                warn!("Custom split sum {} does not match amount {}", total, expense.amount);
                return Err(BillSplitError::InvalidSplit(total, expense.amount));
            }
        }
        Ok(())
    }

    fn validate_groups(&self, groups: &[MemberGroup], members: &[Member]) -> Result<(), BillSplitError> {
        let known: HashSet<MemberId> = members.iter().map(|m| m.id).collect();
        let mut ids = HashSet::new();

        for group in groups {
            if group.id.trim().is_empty() {
                return Err(BillSplitError::InvalidGroup("group id cannot be empty".to_string()));
            }
            if !ids.insert(group.id.as_str()) {
                return Err(BillSplitError::InvalidGroup(format!("duplicate group id {}", group.id)));
            }
            self.validate_string_input("group name", &group.name, MAX_NAME_LENGTH)?;

            let distinct: HashSet<MemberId> = group.member_ids.iter().copied().collect();
            if distinct.len() < 2 {
                return Err(BillSplitError::InvalidGroup(format!(
                    "group {} needs at least two members",
                    group.id
                )));
            }
            if let Some(unknown) = distinct.iter().find(|id| !known.contains(*id)) {
                return Err(BillSplitError::UnknownParticipant(*unknown));
            }
        }
        Ok(())
    }

    // HELPERS

    async fn load_session(&self, code: &str) -> Result<Session, BillSplitError> {
        self.storage
            .get_session_by_code(code)
            .await?
            .ok_or_else(|| BillSplitError::SessionNotFound(code.to_string()))
    }

    async fn load_member(&self, session: &Session, member_id: MemberId) -> Result<Member, BillSplitError> {
        self.storage
            .get_member(member_id)
            .await?
            .filter(|m| m.session_id == session.id)
            .ok_or(BillSplitError::MemberNotFound(member_id))
    }

    async fn load_expense(&self, session: &Session, expense_id: i64) -> Result<Expense, BillSplitError> {
        self.storage
            .get_expense(expense_id)
            .await?
            .filter(|e| e.session_id == session.id)
            .ok_or(BillSplitError::ExpenseNotFound(expense_id))
    }

    async fn log_action(
        &self,
        session_code: Option<&str>,
        action: &str,
        details: serde_json::Value,
    ) -> Result<(), BillSplitError> {
        self.logging.log_action(action, details, session_code).await
    }

    async fn generate_code(&self) -> Result<String, BillSplitError> {
        loop {
            let code: String = Uuid::new_v4()
                .simple()
                .to_string()
                .to_uppercase()
                .chars()
                .take(self.code_length)
                .collect();
            if self.storage.get_session_by_code(&code).await?.is_none() {
                return Ok(code);
            }
            debug!("Session code {} already taken, retrying", code);
        }
    }

    async fn compute_snapshot(&self, session: &Session) -> Result<SessionSnapshot, BillSplitError> {
        let members = self.storage.get_members(session.id).await?;
        let expenses = self.storage.get_expenses(session.id).await?;
        Ok(recompute(&members, &expenses, session.active_groups()))
    }

    /// Recomputes after an edit. Settlements are persisted and broadcast only
    /// when they differ from the last ones sent.
    async fn refresh(&self, mut session: Session) -> Result<SessionSnapshot, BillSplitError> {
        self.cache.invalidate_snapshot(&session.code).await?;
        let snapshot = self.compute_snapshot(&session).await?;
        self.cache
            .save_snapshot(&session.code, &snapshot, self.snapshot_ttl)
            .await?;

        if snapshot.settlements != session.settlements {
            debug!(
                "Settlements changed for session {}: {} -> {}",
                session.code,
                session.settlements.len(),
                snapshot.settlements.len()
            );
            session.settlements = snapshot.settlements.clone();
            self.storage.save_session(session.clone()).await?;
            self.hub
                .publish(&session.code, ServerMessage::SettlementsUpdated(snapshot.clone()))
                .await;
        }
        Ok(snapshot)
    }

    // SESSIONS

    pub async fn create_session(&self) -> Result<Session, BillSplitError> {
        let _guard = self.mutation_lock.lock().await;
        let code = self.generate_code().await?;
        let session = self.storage.create_session(code).await?;
        self.colors.write().await.insert(session.code.clone(), ColorCache::new());

        info!("Created session {} ({})", session.code, session.id);
        self.log_action(
            Some(&session.code),
            SESSION_CREATED,
            json!({ "session_id": session.id, "code": session.code }),
        )
        .await?;
        Ok(session)
    }

    pub async fn get_session(&self, code: &str) -> Result<Session, BillSplitError> {
        self.load_session(code).await
    }

    pub async fn get_session_view(&self, code: &str) -> Result<SessionView, BillSplitError> {
        let session = self.load_session(code).await?;
        let members = self.storage.get_members(session.id).await?;
        let expenses = self.storage.get_expenses(session.id).await?;
        let snapshot = self.snapshot(code).await?;

        let mut colors = self.colors.write().await;
        let palette = colors.entry(session.code.clone()).or_default();
        let members = members
            .into_iter()
            .map(|member| {
                let color = palette.color_for(member.id);
                MemberView {
                    member,
                    color: color.to_string(),
                    text_color: contrast_text_color(color).to_string(),
                }
            })
            .collect();

        Ok(SessionView {
            session,
            members,
            expenses,
            snapshot,
        })
    }

    /// Derived balances, settlements and summary, from cache when fresh.
    pub async fn snapshot(&self, code: &str) -> Result<SessionSnapshot, BillSplitError> {
        if let Some(snapshot) = self.cache.get_snapshot(code).await? {
            return Ok(snapshot);
        }

        // Fills run under the edit lock so they never cache pre-edit data.
        let _guard = self.mutation_lock.lock().await;
        if let Some(snapshot) = self.cache.get_snapshot(code).await? {
            return Ok(snapshot);
        }
        let session = self.load_session(code).await?;
        let snapshot = self.compute_snapshot(&session).await?;
        self.cache.save_snapshot(code, &snapshot, self.snapshot_ttl).await?;
        Ok(snapshot)
    }

    pub async fn subscribe(&self, code: &str) -> Result<broadcast::Receiver<ServerMessage>, BillSplitError> {
        let session = self.load_session(code).await?;
        Ok(self.hub.subscribe(&session.code).await)
    }

    // MEMBERS

    pub async fn add_member(&self, code: &str, member: NewMember) -> Result<Member, BillSplitError> {
        self.validate_string_input("name", &member.name, MAX_NAME_LENGTH)?;
        if let Some(slots) = member.slots {
            self.validate_slots(slots)?;
        }

        let _guard = self.mutation_lock.lock().await;
        let session = self.load_session(code).await?;
        let member = self.storage.create_member(session.id, member).await?;
        debug!("Member {} added to session {}", member.id, code);

        self.hub
            .publish(code, ServerMessage::MemberAdded(member.clone()))
            .await;
        self.refresh(session).await?;
        self.log_action(
            Some(code),
            MEMBER_ADDED,
            json!({ "member_id": member.id, "name": member.name, "slots": member.slots }),
        )
        .await?;
        Ok(member)
    }

    pub async fn update_member(
        &self,
        code: &str,
        member_id: MemberId,
        name: Option<String>,
        slots: Option<u32>,
    ) -> Result<Member, BillSplitError> {
        if let Some(ref name) = name {
            self.validate_string_input("name", name, MAX_NAME_LENGTH)?;
        }
        if let Some(slots) = slots {
            self.validate_slots(slots)?;
        }

        let _guard = self.mutation_lock.lock().await;
        let session = self.load_session(code).await?;
        let mut member = self.load_member(&session, member_id).await?;
        if let Some(name) = name {
            member.name = name;
        }
        if let Some(slots) = slots {
            member.slots = slots;
        }
        self.storage.save_member(member.clone()).await?;

        self.hub
            .publish(code, ServerMessage::MemberUpdated(member.clone()))
            .await;
        self.refresh(session).await?;
        self.log_action(
            Some(code),
            MEMBER_UPDATED,
            json!({ "member_id": member.id, "name": member.name, "slots": member.slots }),
        )
        .await?;
        Ok(member)
    }

    /// Deletes a member together with the expenses it paid; it is also
    /// dropped from other expenses' participants and from any group.
    pub async fn delete_member(&self, code: &str, member_id: MemberId) -> Result<(), BillSplitError> {
        let _guard = self.mutation_lock.lock().await;
        let mut session = self.load_session(code).await?;
        self.load_member(&session, member_id).await?;

        if !self.storage.delete_member(member_id).await? {
            return Err(BillSplitError::MemberNotFound(member_id));
        }

        if session.groups.iter().any(|g| g.contains(member_id)) {
            for group in &mut session.groups {
                group.member_ids.retain(|&id| id != member_id);
            }
            // A group of one is no longer a group.
            session.groups.retain(|g| g.member_ids.len() >= 2);
            self.storage.save_session(session.clone()).await?;
        }
        if let Some(palette) = self.colors.write().await.get_mut(&session.code) {
            palette.forget(member_id);
        }

        info!("Member {} deleted from session {}", member_id, code);
        self.hub
            .publish(code, ServerMessage::MemberDeleted { id: member_id })
            .await;
        self.refresh(session).await?;
        self.log_action(Some(code), MEMBER_DELETED, json!({ "member_id": member_id }))
            .await?;
        Ok(())
    }

    // EXPENSES

    pub async fn add_expense(&self, code: &str, expense: NewExpense) -> Result<Expense, BillSplitError> {
        let _guard = self.mutation_lock.lock().await;
        let session = self.load_session(code).await?;
        let members = self.storage.get_members(session.id).await?;
        self.validate_expense(&expense, &members)?;

        let expense = self.storage.create_expense(session.id, expense).await?;
        debug!("Expense {} added to session {}", expense.id, code);

        self.hub
            .publish(code, ServerMessage::ExpenseAdded(expense.clone()))
            .await;
        self.refresh(session).await?;
        self.log_action(
            Some(code),
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "name": expense.name,
                "amount": expense.amount,
                "payer_id": expense.payer_id
            }),
        )
        .await?;
        Ok(expense)
    }

    pub async fn update_expense(
        &self,
        code: &str,
        expense_id: i64,
        update: ExpenseUpdate,
    ) -> Result<Expense, BillSplitError> {
        let _guard = self.mutation_lock.lock().await;
        let session = self.load_session(code).await?;
        let mut candidate = self.load_expense(&session, expense_id).await?;
        candidate.apply(update.clone());

        let members = self.storage.get_members(session.id).await?;
        self.validate_expense(&NewExpense::from(candidate), &members)?;

        let expense = self
            .storage
            .update_expense(expense_id, update)
            .await?
            .ok_or(BillSplitError::ExpenseNotFound(expense_id))?;

        self.hub
            .publish(code, ServerMessage::ExpenseUpdated(expense.clone()))
            .await;
        self.refresh(session).await?;
        self.log_action(
            Some(code),
            EXPENSE_UPDATED,
            json!({ "expense_id": expense.id, "amount": expense.amount }),
        )
        .await?;
        Ok(expense)
    }

    pub async fn delete_expense(&self, code: &str, expense_id: i64) -> Result<(), BillSplitError> {
        let _guard = self.mutation_lock.lock().await;
        let session = self.load_session(code).await?;
        self.load_expense(&session, expense_id).await?;

        if !self.storage.delete_expense(expense_id).await? {
            return Err(BillSplitError::ExpenseNotFound(expense_id));
        }

        self.hub
            .publish(code, ServerMessage::ExpenseDeleted { id: expense_id })
            .await;
        self.refresh(session).await?;
        self.log_action(Some(code), EXPENSE_DELETED, json!({ "expense_id": expense_id }))
            .await?;
        Ok(())
    }

    // GROUPING

    pub async fn update_grouping(
        &self,
        code: &str,
        groups: Vec<MemberGroup>,
        enabled: bool,
    ) -> Result<Session, BillSplitError> {
        let _guard = self.mutation_lock.lock().await;
        let mut session = self.load_session(code).await?;
        let members = self.storage.get_members(session.id).await?;
        self.validate_groups(&groups, &members)?;

        session.groups = groups;
        session.grouping_enabled = enabled;
        self.storage.save_session(session.clone()).await?;

        self.hub
            .publish(
                code,
                ServerMessage::GroupingUpdated {
                    groups: session.groups.clone(),
                    enabled,
                },
            )
            .await;
        self.refresh(session.clone()).await?;
        self.log_action(
            Some(code),
            GROUPING_UPDATED,
            json!({
                "enabled": enabled,
                "group_ids": session.groups.iter().map(|g| g.id.clone()).collect::<Vec<_>>()
            }),
        )
        .await?;

        // Reload: refresh may have stored a new settlement snapshot.
        self.load_session(code).await
    }

    // REPORTS

    pub async fn export(&self, code: &str, format: ExportFormat) -> Result<String, BillSplitError> {
        let session = self.load_session(code).await?;
        let members = self.storage.get_members(session.id).await?;
        let expenses = self.storage.get_expenses(session.id).await?;
        let snapshot = self.snapshot(code).await?;

        let report = export(
            &ExportInput {
                members: &members,
                expenses: &expenses,
                groups: session.active_groups(),
                snapshot: &snapshot,
                generated_at: Utc::now(),
            },
            format,
        )?;

        self.log_action(
            Some(code),
            SESSION_EXPORTED,
            json!({ "format": format!("{:?}", format).to_lowercase() }),
        )
        .await?;
        Ok(report)
    }

    pub async fn get_app_logs(&self, code: Option<&str>) -> Result<Vec<AppLog>, BillSplitError> {
        match code {
            Some(code) => self.logging.get_session_logs(code).await,
            None => self.logging.get_logs().await,
        }
    }
}
