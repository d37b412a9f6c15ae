use super::member::MemberId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Net position of a member or group: positive is owed money, negative owes.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// A suggested payment. When a side carries a group id, its member id is
/// only the group's representative.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub from_id: MemberId,
    pub to_id: MemberId,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_group_id: Option<String>,
}
