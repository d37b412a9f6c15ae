//! WebSocket wire protocol.
//!
//! Every frame is `{"type": "...", "payload": {...}}`. Client frames are
//! decoded into [`ClientMessage`] before the service sees them; anything
//! that does not match a known shape is rejected at this boundary.
//! `type` has to come before `payload`, otherwise the payload is buffered
//! and integer map keys (`customAmounts`) fail to parse.

use crate::core::calculations::SessionSnapshot;
use crate::core::errors::BillSplitError;
use crate::core::models::{Expense, ExpenseUpdate, Member, MemberGroup, MemberId, NewExpense, Session};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    JoinSession {
        code: String,
    },
    MemberAdded {
        name: String,
        #[serde(default)]
        slots: Option<u32>,
    },
    MemberUpdated {
        id: MemberId,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        slots: Option<u32>,
    },
    MemberDeleted {
        id: MemberId,
    },
    ExpenseAdded(NewExpense),
    ExpenseUpdated(ExpenseEdit),
    ExpenseDeleted {
        id: i64,
    },
    GroupingUpdated {
        groups: Vec<MemberGroup>,
        enabled: bool,
    },
}

/// Expense id plus the fields to change. Kept flat rather than
/// `#[serde(flatten)]`-ed: flattening buffers the payload and integer map
/// keys in `customAmounts` no longer parse.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEdit {
    pub id: i64,
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub payer_id: Option<MemberId>,
    pub participants: Option<BTreeSet<MemberId>>,
    pub is_custom_split: Option<bool>,
    pub custom_amounts: Option<BTreeMap<MemberId, i64>>,
}

impl ExpenseEdit {
    pub fn into_parts(self) -> (i64, ExpenseUpdate) {
        (
            self.id,
            ExpenseUpdate {
                name: self.name,
                amount: self.amount,
                payer_id: self.payer_id,
                participants: self.participants,
                is_custom_split: self.is_custom_split,
                custom_amounts: self.custom_amounts,
            },
        )
    }
}

impl ClientMessage {
    pub fn decode(raw: &str) -> Result<Self, BillSplitError> {
        serde_json::from_str(raw).map_err(|e| BillSplitError::InvalidMessage(e.to_string()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    #[serde(flatten)]
    pub member: Member,
    pub color: String,
    pub text_color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session: Session,
    pub members: Vec<MemberView>,
    pub expenses: Vec<Expense>,
    pub snapshot: SessionSnapshot,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    SessionData(Box<SessionView>),
    MemberAdded(Member),
    MemberUpdated(Member),
    MemberDeleted { id: MemberId },
    ExpenseAdded(Expense),
    ExpenseUpdated(Expense),
    ExpenseDeleted { id: i64 },
    GroupingUpdated { groups: Vec<MemberGroup>, enabled: bool },
    SettlementsUpdated(SessionSnapshot),
    Error { message: String },
}

impl ServerMessage {
    pub fn error(err: &BillSplitError) -> Self {
        ServerMessage::Error {
            message: err.to_string(),
        }
    }

    pub fn encode(&self) -> Result<String, BillSplitError> {
        serde_json::to_string(self).map_err(|e| BillSplitError::InternalServerError(e.to_string()))
    }
}
