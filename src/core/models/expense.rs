use super::member::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use utoipa::ToSchema;

/// An expense fronted by one member and shared by `participants`.
///
/// Amounts are integers in thousand VND. When `is_custom_split` is set the
/// shares come from `custom_amounts`; otherwise they are proportional to
/// each participant's slots.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub session_id: i64,
    pub name: String,
    pub amount: i64,
    pub payer_id: MemberId,
    pub participants: BTreeSet<MemberId>,
    #[serde(default)]
    pub is_custom_split: bool,
    #[serde(default)]
    pub custom_amounts: BTreeMap<MemberId, i64>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub name: String,
    pub amount: i64,
    pub payer_id: MemberId,
    pub participants: BTreeSet<MemberId>,
    #[serde(default)]
    pub is_custom_split: bool,
    #[serde(default)]
    pub custom_amounts: BTreeMap<MemberId, i64>,
}

/// Partial expense edit; absent fields keep their stored value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub payer_id: Option<MemberId>,
    pub participants: Option<BTreeSet<MemberId>>,
    pub is_custom_split: Option<bool>,
    pub custom_amounts: Option<BTreeMap<MemberId, i64>>,
}

impl Expense {
    pub fn apply(&mut self, update: ExpenseUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(payer_id) = update.payer_id {
            self.payer_id = payer_id;
        }
        if let Some(participants) = update.participants {
            self.participants = participants;
        }
        if let Some(is_custom_split) = update.is_custom_split {
            self.is_custom_split = is_custom_split;
        }
        if let Some(custom_amounts) = update.custom_amounts {
            self.custom_amounts = custom_amounts;
        }
    }
}

impl From<Expense> for NewExpense {
    fn from(expense: Expense) -> Self {
        NewExpense {
            name: expense.name,
            amount: expense.amount,
            payer_id: expense.payer_id,
            participants: expense.participants,
            is_custom_split: expense.is_custom_split,
            custom_amounts: expense.custom_amounts,
        }
    }
}
