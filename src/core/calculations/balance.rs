use super::round_cents;
use super::split::weighted_share;
use crate::core::models::{Expense, Member, MemberBalance, MemberId};
use log::{debug, warn};
use std::collections::HashMap;

/// Net balance of every member: what they paid minus what they owe.
///
/// Results follow the order of `members`. Ids referenced by an expense but
/// missing from `members` still get an entry (appended in first-seen order)
/// so the balances keep summing to zero.
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Vec<MemberBalance> {
    let mut order: Vec<MemberId> = members.iter().map(|m| m.id).collect();
    let mut totals: HashMap<MemberId, f64> = order.iter().map(|&id| (id, 0.0)).collect();

    let mut credit = |id: MemberId, delta: f64| {
        let entry = totals.entry(id).or_insert_with(|| {
            warn!("Expense references unknown member {}", id);
            order.push(id);
            0.0
        });
        *entry += delta;
    };

    for expense in expenses {
        if expense.participants.is_empty() {
            debug!("Skipping expense {} without participants", expense.id);
            continue;
        }

        credit(expense.payer_id, expense.amount as f64);

        // A custom split only counts when amounts were actually entered;
        // participants left out of it owe nothing.
        if expense.is_custom_split && !expense.custom_amounts.is_empty() {
            for &participant in &expense.participants {
                let share = expense.custom_amounts.get(&participant).copied().unwrap_or(0);
                credit(participant, -(share as f64));
            }
        } else {
            for &participant in &expense.participants {
                credit(participant, -weighted_share(expense, participant, members));
            }
        }
    }

    let balances: Vec<MemberBalance> = order
        .iter()
        .map(|id| MemberBalance {
            member_id: *id,
            balance: round_cents(totals.get(id).copied().unwrap_or(0.0)),
            group_id: None,
        })
        .collect();

    debug!("Balances calculated: {:?}", balances);
    balances
}
