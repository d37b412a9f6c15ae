use super::member::MemberId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A cluster of members settled as one financial unit.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberGroup {
    pub id: String,
    pub name: String,
    pub member_ids: Vec<MemberId>,
}

impl MemberGroup {
    pub fn contains(&self, member_id: MemberId) -> bool {
        self.member_ids.contains(&member_id)
    }
}
