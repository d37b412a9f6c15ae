use super::{apply_grouping, compute_balances, compute_settlements, compute_summary};
use crate::core::models::{Expense, ExpenseSummary, Member, MemberBalance, MemberGroup, Settlement};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Everything derived from a session's members, expenses and groups.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Per-member balances, before any grouping.
    pub balances: Vec<MemberBalance>,
    pub settlements: Vec<Settlement>,
    pub summary: ExpenseSummary,
}

/// Runs the full pipeline. Settlements are computed on grouped balances when
/// `groups` is non-empty; pass an empty slice to settle member by member.
pub fn recompute(members: &[Member], expenses: &[Expense], groups: &[MemberGroup]) -> SessionSnapshot {
    let balances = compute_balances(members, expenses);
    let settlements = if groups.is_empty() {
        compute_settlements(&balances)
    } else {
        compute_settlements(&apply_grouping(&balances, groups))
    };

    SessionSnapshot {
        balances,
        settlements,
        summary: compute_summary(expenses),
    }
}
