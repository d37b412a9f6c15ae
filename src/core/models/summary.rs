use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    pub amount: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub total_amount: i64,
    pub expense_count: usize,
    pub largest_expense: Option<CategoryTotal>,
    pub expenses_by_category: Vec<CategoryTotal>,
}
