mod color_tests;
mod session_tests;

use crate::api::AppService;
use crate::core::models::{Expense, Member, MemberBalance, MemberGroup, MemberId};
use crate::core::services::SessionService;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::{Storage, in_memory::InMemoryStorage};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

pub fn create_test_service() -> SessionService<InMemoryLogging, InMemoryStorage, InMemoryCache> {
    let _ = env_logger::try_init();
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let cache = InMemoryCache::new();
    SessionService::new(storage, logging, cache)
}

/// The service as the server wires it, behind `Arc<dyn Storage>`.
pub fn create_app_service() -> Arc<AppService> {
    let _ = env_logger::try_init();
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    Arc::new(SessionService::new(storage, InMemoryLogging::new(), InMemoryCache::new()))
}

pub fn member(id: MemberId, name: &str, slots: u32) -> Member {
    Member {
        id,
        session_id: 1,
        name: name.to_string(),
        slots,
    }
}

/// Equal-split expense dated 2024-06-01.
pub fn expense(id: i64, name: &str, amount: i64, payer_id: MemberId, participants: &[MemberId]) -> Expense {
    Expense {
        id,
        session_id: 1,
        name: name.to_string(),
        amount,
        payer_id,
        participants: participants.iter().copied().collect(),
        is_custom_split: false,
        custom_amounts: Default::default(),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

pub fn custom_expense(id: i64, amount: i64, payer_id: MemberId, shares: &[(MemberId, i64)]) -> Expense {
    let mut expense = expense(id, "Custom", amount, payer_id, &[]);
    expense.participants = shares.iter().map(|(id, _)| *id).collect();
    expense.custom_amounts = shares.iter().copied().collect();
    expense.is_custom_split = true;
    expense
}

pub fn balance(member_id: MemberId, value: f64) -> MemberBalance {
    MemberBalance {
        member_id,
        balance: value,
        group_id: None,
    }
}

pub fn group(id: &str, member_ids: &[MemberId]) -> MemberGroup {
    MemberGroup {
        id: id.to_string(),
        name: id.to_uppercase(),
        member_ids: member_ids.to_vec(),
    }
}

pub fn three_friends() -> Vec<Member> {
    vec![member(1, "An", 1), member(2, "Binh", 1), member(3, "Chi", 1)]
}
