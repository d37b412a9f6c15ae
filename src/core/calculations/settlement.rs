use super::BALANCE_EPSILON;
use crate::core::models::{MemberBalance, Settlement};
use log::debug;

/// Greedy largest-debtor to largest-creditor matching.
///
/// Each step settles `min(|debt|, credit)` between the two largest parties,
/// which clears at least one of them, so at most `n - 1` settlements come out
/// of `n` non-zero balances. Amounts are rounded to whole units and payments
/// that round to zero are dropped. The input is left untouched.
pub fn compute_settlements(balances: &[MemberBalance]) -> Vec<Settlement> {
    debug!("Computing settlements for balances: {:?}", balances);

    let mut creditors: Vec<MemberBalance> = balances
        .iter()
        .filter(|b| b.balance > 0.0)
        .cloned()
        .collect();
    let mut debtors: Vec<MemberBalance> = balances
        .iter()
        .filter(|b| b.balance < 0.0)
        .cloned()
        .collect();

    sort_parties(&mut creditors, &mut debtors);

    let mut settlements = Vec::new();
    while !creditors.is_empty() && !debtors.is_empty() {
        let amount = creditors[0].balance.min(-debtors[0].balance);
        let rounded = amount.round() as i64;

        if rounded > 0 {
            settlements.push(Settlement {
                from_id: debtors[0].member_id,
                to_id: creditors[0].member_id,
                amount: rounded,
                from_group_id: debtors[0].group_id.clone(),
                to_group_id: creditors[0].group_id.clone(),
            });
        }

        creditors[0].balance -= amount;
        debtors[0].balance += amount;

        if creditors[0].balance.abs() < BALANCE_EPSILON {
            creditors.remove(0);
        }
        if debtors[0].balance.abs() < BALANCE_EPSILON {
            debtors.remove(0);
        }
        sort_parties(&mut creditors, &mut debtors);
    }

    debug!("Settlements computed: {:?}", settlements);
    settlements
}

/// Largest creditor first, most negative debtor first. Stable on ties.
fn sort_parties(creditors: &mut [MemberBalance], debtors: &mut [MemberBalance]) {
    creditors.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    debtors.sort_by(|a, b| a.balance.total_cmp(&b.balance));
}
