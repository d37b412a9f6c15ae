use crate::core::models::{DEFAULT_SLOTS, Expense, Member, MemberId};
use std::collections::BTreeMap;

/// Slot weight of `member_id`, falling back to one share for unknown members.
pub fn member_slots(member_id: MemberId, members: &[Member]) -> u32 {
    members
        .iter()
        .find(|m| m.id == member_id)
        .map(|m| m.slots.max(DEFAULT_SLOTS))
        .unwrap_or(DEFAULT_SLOTS)
}

/// Sum of the participants' slots.
pub fn total_slots(expense: &Expense, members: &[Member]) -> u64 {
    expense
        .participants
        .iter()
        .map(|&p| u64::from(member_slots(p, members)))
        .sum()
}

/// Unrounded slot-weighted share of `member_id` in `expense`.
pub(crate) fn weighted_share(expense: &Expense, member_id: MemberId, members: &[Member]) -> f64 {
    let total = total_slots(expense, members);
    if total == 0 {
        return 0.0;
    }
    expense.amount as f64 * f64::from(member_slots(member_id, members)) / total as f64
}

/// What `member_id` owes for `expense`, as displayed per member.
///
/// Shares are rounded independently, so for an equal split they need not
/// add back up to the expense amount (100 over three people gives 33 each).
pub fn split_amount(expense: &Expense, member_id: MemberId, members: &[Member]) -> i64 {
    if !expense.participants.contains(&member_id) {
        return 0;
    }

    if expense.is_custom_split {
        if let Some(&custom) = expense.custom_amounts.get(&member_id) {
            return custom;
        }
    }

    weighted_share(expense, member_id, members).round() as i64
}

/// `split_amount` for every member of the session, non-participants at 0.
pub fn split_amounts(expense: &Expense, members: &[Member]) -> BTreeMap<MemberId, i64> {
    members
        .iter()
        .map(|m| (m.id, split_amount(expense, m.id, members)))
        .collect()
}
