use super::balance::Settlement;
use super::group::MemberGroup;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub code: String,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub groups: Vec<MemberGroup>,
    #[serde(default)]
    pub grouping_enabled: bool,
    /// Last settlement list pushed to clients, kept so reconnecting clients
    /// see it without a recomputation.
    #[serde(default)]
    pub settlements: Vec<Settlement>,
}

impl Session {
    /// Codes are matched trimmed and upper-cased wherever clients type them.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Groups in effect for settlement; empty when grouping is switched off.
    pub fn active_groups(&self) -> &[MemberGroup] {
        if self.grouping_enabled { &self.groups } else { &[] }
    }
}
