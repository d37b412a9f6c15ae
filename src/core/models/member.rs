use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type MemberId = i64;

pub const DEFAULT_SLOTS: u32 = 1;

fn default_slots() -> u32 {
    DEFAULT_SLOTS
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub session_id: i64,
    pub name: String,
    /// How many equal shares this member counts as (a couple is 2).
    #[serde(default = "default_slots")]
    pub slots: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    #[serde(default)]
    pub slots: Option<u32>,
}
