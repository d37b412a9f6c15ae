use super::round_cents;
use crate::core::models::{MemberBalance, MemberGroup, MemberId};
use log::{debug, warn};
use std::collections::HashMap;

/// Group id standing in for a member that belongs to no group.
pub fn individual_group_id(member_id: MemberId) -> String {
    format!("individual-{}", member_id)
}

/// Collapses individual balances into one entry per group.
///
/// Ungrouped members become their own `individual-<id>` group. A member
/// listed in several groups is counted in the first one. Each entry is
/// represented by the first of its members met in `balances`, and entries
/// come out in the order their groups are first met.
pub fn apply_grouping(balances: &[MemberBalance], groups: &[MemberGroup]) -> Vec<MemberBalance> {
    let mut member_to_group: HashMap<MemberId, &str> = HashMap::new();
    for group in groups {
        for &member_id in &group.member_ids {
            if let Some(existing) = member_to_group.get(&member_id) {
                warn!(
                    "Member {} is in groups {} and {}; keeping {}",
                    member_id, existing, group.id, existing
                );
                continue;
            }
            member_to_group.insert(member_id, group.id.as_str());
        }
    }

    let mut grouped: Vec<MemberBalance> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for balance in balances {
        let group_id = member_to_group
            .get(&balance.member_id)
            .map(|g| g.to_string())
            .unwrap_or_else(|| individual_group_id(balance.member_id));

        match index.get(&group_id) {
            Some(&i) => grouped[i].balance += balance.balance,
            None => {
                index.insert(group_id.clone(), grouped.len());
                grouped.push(MemberBalance {
                    member_id: balance.member_id,
                    balance: balance.balance,
                    group_id: Some(group_id),
                });
            }
        }
    }

    for entry in &mut grouped {
        entry.balance = round_cents(entry.balance);
    }

    debug!("Grouped balances: {:?}", grouped);
    grouped
}
