use crate::constants::{EXPENSE_ADDED, MEMBER_ADDED, SESSION_CREATED};
use crate::core::errors::BillSplitError;
use crate::core::export::ExportFormat;
use crate::core::messages::ServerMessage;
use crate::core::models::{Expense, ExpenseUpdate, Member, MemberId, NewExpense, NewMember, Session};
use crate::core::services::SessionService;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::{Storage, in_memory::InMemoryStorage};
use crate::tests::{create_test_service, group};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn named(name: &str) -> NewMember {
    NewMember {
        name: name.to_string(),
        slots: None,
    }
}

fn shared_expense(name: &str, amount: i64, payer: &Member, participants: &[&Member]) -> NewExpense {
    NewExpense {
        name: name.to_string(),
        amount,
        payer_id: payer.id,
        participants: participants.iter().map(|m| m.id).collect(),
        is_custom_split: false,
        custom_amounts: BTreeMap::new(),
    }
}

#[tokio::test]
async fn test_create_session_generates_code() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();

    assert_eq!(session.code.len(), 6);
    assert!(session.code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    assert!(!session.grouping_enabled);
    assert!(session.settlements.is_empty());

    let other = service.create_session().await.unwrap();
    assert_ne!(session.code, other.code);
}

#[tokio::test]
async fn test_code_length_is_configurable() {
    let service = create_test_service().with_code_length(8);
    let session = service.create_session().await.unwrap();
    assert_eq!(session.code.len(), 8);
}

#[tokio::test]
async fn test_unknown_session() {
    let service = create_test_service();
    let result = service.add_member("NOPE00", named("An")).await;
    assert!(matches!(result, Err(BillSplitError::SessionNotFound(_))));
}

#[tokio::test]
async fn test_member_validation() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();

    let blank = service.add_member(&session.code, named("   ")).await;
    assert!(matches!(blank, Err(BillSplitError::InvalidInput(field, _)) if field == "name"));

    let markup = service.add_member(&session.code, named("<script>")).await;
    assert!(matches!(markup, Err(BillSplitError::InvalidInput(_, _))));

    let too_many_slots = service
        .add_member(
            &session.code,
            NewMember {
                name: "An".to_string(),
                slots: Some(0),
            },
        )
        .await;
    assert!(matches!(too_many_slots, Err(BillSplitError::InvalidInput(field, _)) if field == "slots"));
}

#[tokio::test]
async fn test_expense_flow_updates_snapshot() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    let binh = service.add_member(&session.code, named("Binh")).await.unwrap();
    let chi = service.add_member(&session.code, named("Chi")).await.unwrap();

    service
        .add_expense(&session.code, shared_expense("Dinner", 90, &an, &[&an, &binh, &chi]))
        .await
        .unwrap();

    let snapshot = service.snapshot(&session.code).await.unwrap();
    assert_eq!(snapshot.balances[0].balance, 60.0);
    assert_eq!(snapshot.settlements.len(), 2);
    assert_eq!(snapshot.summary.total_amount, 90);

    let stored = service.get_session(&session.code).await.unwrap();
    assert_eq!(stored.settlements, snapshot.settlements);
}

#[tokio::test]
async fn test_expense_validation() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    let binh = service.add_member(&session.code, named("Binh")).await.unwrap();

    let no_one = service
        .add_expense(&session.code, shared_expense("Dinner", 90, &an, &[]))
        .await;
    assert!(matches!(no_one, Err(BillSplitError::EmptyParticipants)));

    let free = service
        .add_expense(&session.code, shared_expense("Dinner", 0, &an, &[&an]))
        .await;
    assert!(matches!(free, Err(BillSplitError::InvalidInput(field, _)) if field == "amount"));

    let mut stranger = shared_expense("Dinner", 90, &an, &[&an]);
    stranger.participants.insert(999);
    let stranger = service.add_expense(&session.code, stranger).await;
    assert!(matches!(stranger, Err(BillSplitError::UnknownParticipant(999))));

    let mut uneven = shared_expense("Dinner", 90, &an, &[&an, &binh]);
    uneven.is_custom_split = true;
    uneven.custom_amounts = BTreeMap::from([(an.id, 30), (binh.id, 50)]);
    let uneven = service.add_expense(&session.code, uneven).await;
    assert!(matches!(uneven, Err(BillSplitError::InvalidSplit(80, 90))));

    let mut outsider = shared_expense("Dinner", 90, &an, &[&an]);
    outsider.is_custom_split = true;
    outsider.custom_amounts = BTreeMap::from([(an.id, 40), (binh.id, 50)]);
    let outsider = service.add_expense(&session.code, outsider).await;
    assert!(matches!(outsider, Err(BillSplitError::UnknownParticipant(id)) if id == binh.id));
}

#[tokio::test]
async fn test_members_of_other_sessions_are_rejected() {
    let service = create_test_service();
    let first = service.create_session().await.unwrap();
    let second = service.create_session().await.unwrap();
    let an = service.add_member(&first.code, named("An")).await.unwrap();
    let binh = service.add_member(&second.code, named("Binh")).await.unwrap();

    let result = service
        .add_expense(&second.code, shared_expense("Dinner", 90, &binh, &[&an, &binh]))
        .await;
    assert!(matches!(result, Err(BillSplitError::UnknownParticipant(id)) if id == an.id));

    let result = service.delete_member(&second.code, an.id).await;
    assert!(matches!(result, Err(BillSplitError::MemberNotFound(_))));
}

#[tokio::test]
async fn test_partial_expense_update() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    let binh = service.add_member(&session.code, named("Binh")).await.unwrap();
    let expense = service
        .add_expense(&session.code, shared_expense("Taxi", 40, &an, &[&an, &binh]))
        .await
        .unwrap();

    let updated = service
        .update_expense(
            &session.code,
            expense.id,
            ExpenseUpdate {
                amount: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, 100);
    assert_eq!(updated.name, "Taxi");
    assert_eq!(updated.participants.len(), 2);

    let snapshot = service.snapshot(&session.code).await.unwrap();
    assert_eq!(snapshot.settlements[0].amount, 50);

    // Turning on a custom split that no longer adds up is refused.
    let invalid = service
        .update_expense(
            &session.code,
            expense.id,
            ExpenseUpdate {
                is_custom_split: Some(true),
                custom_amounts: Some(BTreeMap::from([(an.id, 10)])),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(invalid, Err(BillSplitError::InvalidSplit(10, 100))));

    let missing = service
        .update_expense(&session.code, 4242, ExpenseUpdate::default())
        .await;
    assert!(matches!(missing, Err(BillSplitError::ExpenseNotFound(4242))));
}

#[tokio::test]
async fn test_delete_member_cascades_and_clears_groups() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    let binh = service.add_member(&session.code, named("Binh")).await.unwrap();
    let chi = service.add_member(&session.code, named("Chi")).await.unwrap();

    service
        .add_expense(&session.code, shared_expense("Dinner", 90, &an, &[&an, &binh, &chi]))
        .await
        .unwrap();
    service
        .add_expense(&session.code, shared_expense("Taxi", 40, &binh, &[&an, &binh]))
        .await
        .unwrap();
    service
        .update_grouping(&session.code, vec![group("g1", &[an.id, binh.id])], true)
        .await
        .unwrap();

    service.delete_member(&session.code, an.id).await.unwrap();

    let view = service.get_session_view(&session.code).await.unwrap();
    assert_eq!(view.members.len(), 2);
    assert_eq!(view.expenses.len(), 1);
    assert_eq!(view.expenses[0].name, "Taxi");
    assert!(!view.expenses[0].participants.contains(&an.id));
    assert!(view.session.groups.is_empty());
}

#[tokio::test]
async fn test_grouping_changes_settlements() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    let binh = service.add_member(&session.code, named("Binh")).await.unwrap();
    let chi = service.add_member(&session.code, named("Chi")).await.unwrap();
    service
        .add_expense(&session.code, shared_expense("Dinner", 90, &an, &[&an, &binh, &chi]))
        .await
        .unwrap();

    let grouped = service
        .update_grouping(&session.code, vec![group("g1", &[binh.id, chi.id])], true)
        .await
        .unwrap();
    assert!(grouped.grouping_enabled);
    assert_eq!(grouped.settlements.len(), 1);
    assert_eq!(grouped.settlements[0].amount, 60);

    // Disabling keeps the groups but settles member by member again.
    let ungrouped = service
        .update_grouping(&session.code, grouped.groups.clone(), false)
        .await
        .unwrap();
    assert_eq!(ungrouped.groups.len(), 1);
    assert_eq!(ungrouped.settlements.len(), 2);
}

#[tokio::test]
async fn test_group_validation() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    let binh = service.add_member(&session.code, named("Binh")).await.unwrap();

    let lonely = service
        .update_grouping(&session.code, vec![group("g1", &[an.id, an.id])], true)
        .await;
    assert!(matches!(lonely, Err(BillSplitError::InvalidGroup(_))));

    let duplicated = service
        .update_grouping(
            &session.code,
            vec![group("g1", &[an.id, binh.id]), group("g1", &[an.id, binh.id])],
            true,
        )
        .await;
    assert!(matches!(duplicated, Err(BillSplitError::InvalidGroup(_))));

    let ghost = service
        .update_grouping(&session.code, vec![group("g1", &[an.id, 999])], true)
        .await;
    assert!(matches!(ghost, Err(BillSplitError::UnknownParticipant(999))));
}

#[tokio::test]
async fn test_subscribers_receive_events_and_settlement_changes() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let mut events = service.subscribe(&session.code).await.unwrap();

    let an = service.add_member(&session.code, named("An")).await.unwrap();
    let binh = service.add_member(&session.code, named("Binh")).await.unwrap();
    assert!(matches!(events.try_recv(), Ok(ServerMessage::MemberAdded(m)) if m.id == an.id));
    assert!(matches!(events.try_recv(), Ok(ServerMessage::MemberAdded(m)) if m.id == binh.id));
    // Settlements did not change, so nothing else was sent.
    assert!(events.try_recv().is_err());

    service
        .add_expense(&session.code, shared_expense("Dinner", 50, &an, &[&an, &binh]))
        .await
        .unwrap();
    assert!(matches!(events.try_recv(), Ok(ServerMessage::ExpenseAdded(_))));
    match events.try_recv() {
        Ok(ServerMessage::SettlementsUpdated(snapshot)) => {
            assert_eq!(snapshot.settlements.len(), 1);
            assert_eq!(snapshot.settlements[0].from_id, binh.id);
            assert_eq!(snapshot.settlements[0].amount, 25);
        }
        other => panic!("expected SETTLEMENTS_UPDATED, got {:?}", other),
    }

    // Renaming changes no balance: no settlement broadcast.
    service
        .update_member(&session.code, an.id, Some("An Nguyen".to_string()), None)
        .await
        .unwrap();
    assert!(matches!(events.try_recv(), Ok(ServerMessage::MemberUpdated(m)) if m.name == "An Nguyen"));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_session_view_assigns_colors() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    service.add_member(&session.code, named("An")).await.unwrap();
    service.add_member(&session.code, named("Binh")).await.unwrap();

    let first = service.get_session_view(&session.code).await.unwrap();
    let second = service.get_session_view(&session.code).await.unwrap();

    assert_eq!(first.members[0].color, "#3B82F6");
    assert_eq!(first.members[0].text_color, "#FFFFFF");
    assert_ne!(first.members[0].color, first.members[1].color);
    assert_eq!(first.members, second.members);
}

#[tokio::test]
async fn test_export_and_activity_log() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    service
        .add_expense(&session.code, shared_expense("Coffee", 20, &an, &[&an]))
        .await
        .unwrap();

    let csv = service.export(&session.code, ExportFormat::Csv).await.unwrap();
    assert!(csv.starts_with("Expense,Amount,Payer,An,Date"));

    let other = service.create_session().await.unwrap();
    let logs = service.get_app_logs(Some(&session.code)).await.unwrap();
    let actions: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
    assert_eq!(&actions[..3], &[SESSION_CREATED, MEMBER_ADDED, EXPENSE_ADDED]);
    assert!(logs.iter().all(|l| l.session_code.as_deref() == Some(session.code.as_str())));

    let all = service.get_app_logs(None).await.unwrap();
    assert!(all.iter().any(|l| l.session_code.as_deref() == Some(other.code.as_str())));
}

#[tokio::test]
async fn test_deleted_member_releases_color() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    service.add_member(&session.code, named("Binh")).await.unwrap();
    let first = service.get_session_view(&session.code).await.unwrap();
    let an_color = first.members[0].color.clone();

    service.delete_member(&session.code, an.id).await.unwrap();
    service.add_member(&session.code, named("Chi")).await.unwrap();

    let view = service.get_session_view(&session.code).await.unwrap();
    assert_eq!(view.members[1].member.name, "Chi");
    assert_eq!(view.members[1].color, an_color);
}

#[tokio::test]
async fn test_deleting_custom_split_participant_falls_back_to_slots() {
    let service = create_test_service();
    let session = service.create_session().await.unwrap();
    let an = service.add_member(&session.code, named("An")).await.unwrap();
    let binh = service.add_member(&session.code, named("Binh")).await.unwrap();
    let chi = service.add_member(&session.code, named("Chi")).await.unwrap();

    let mut dinner = shared_expense("Dinner", 90, &chi, &[&an, &binh]);
    dinner.is_custom_split = true;
    dinner.custom_amounts = BTreeMap::from([(an.id, 30), (binh.id, 60)]);
    let dinner = service.add_expense(&session.code, dinner).await.unwrap();

    service.delete_member(&session.code, binh.id).await.unwrap();

    let snapshot = service.snapshot(&session.code).await.unwrap();
    let total: f64 = snapshot.balances.iter().map(|b| b.balance).sum();
    assert!(total.abs() < 0.01);
    let an_balance = snapshot.balances.iter().find(|b| b.member_id == an.id).unwrap();
    assert_eq!(an_balance.balance, -90.0);

    let renamed = service
        .update_expense(
            &session.code,
            dinner.id,
            ExpenseUpdate {
                name: Some("Late dinner".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!renamed.is_custom_split);
    assert!(renamed.custom_amounts.is_empty());
}

/// Storage whose next `get_members` call stalls, to interleave a snapshot
/// fill with an edit.
struct StallingStorage {
    inner: InMemoryStorage,
    stall_next_read: Arc<AtomicBool>,
}

#[async_trait]
impl Storage for StallingStorage {
    async fn create_session(&self, code: String) -> Result<Session, BillSplitError> {
        self.inner.create_session(code).await
    }

    async fn get_session_by_code(&self, code: &str) -> Result<Option<Session>, BillSplitError> {
        self.inner.get_session_by_code(code).await
    }

    async fn save_session(&self, session: Session) -> Result<(), BillSplitError> {
        self.inner.save_session(session).await
    }

    async fn get_members(&self, session_id: i64) -> Result<Vec<Member>, BillSplitError> {
        let members = self.inner.get_members(session_id).await;
        if self.stall_next_read.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        members
    }

    async fn get_member(&self, member_id: MemberId) -> Result<Option<Member>, BillSplitError> {
        self.inner.get_member(member_id).await
    }

    async fn create_member(&self, session_id: i64, member: NewMember) -> Result<Member, BillSplitError> {
        self.inner.create_member(session_id, member).await
    }

    async fn save_member(&self, member: Member) -> Result<(), BillSplitError> {
        self.inner.save_member(member).await
    }

    async fn delete_member(&self, member_id: MemberId) -> Result<bool, BillSplitError> {
        self.inner.delete_member(member_id).await
    }

    async fn get_expenses(&self, session_id: i64) -> Result<Vec<Expense>, BillSplitError> {
        self.inner.get_expenses(session_id).await
    }

    async fn get_expense(&self, expense_id: i64) -> Result<Option<Expense>, BillSplitError> {
        self.inner.get_expense(expense_id).await
    }

    async fn create_expense(&self, session_id: i64, expense: NewExpense) -> Result<Expense, BillSplitError> {
        self.inner.create_expense(session_id, expense).await
    }

    async fn update_expense(&self, expense_id: i64, update: ExpenseUpdate) -> Result<Option<Expense>, BillSplitError> {
        self.inner.update_expense(expense_id, update).await
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<bool, BillSplitError> {
        self.inner.delete_expense(expense_id).await
    }
}

#[tokio::test]
async fn test_snapshot_fill_does_not_outlive_concurrent_edit() {
    let stall = Arc::new(AtomicBool::new(false));
    let storage = StallingStorage {
        inner: InMemoryStorage::new(),
        stall_next_read: stall.clone(),
    };
    let service = Arc::new(SessionService::new(storage, InMemoryLogging::new(), InMemoryCache::new()));
    let session = service.create_session().await.unwrap();
    stall.store(true, Ordering::SeqCst);

    let reader = {
        let service = service.clone();
        let code = session.code.clone();
        tokio::spawn(async move { service.snapshot(&code).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    service.add_member(&session.code, named("An")).await.unwrap();
    reader.await.unwrap().unwrap();

    let snapshot = service.snapshot(&session.code).await.unwrap();
    assert_eq!(snapshot.balances.len(), 1);
}
