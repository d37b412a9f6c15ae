use crate::core::calculations::{SessionSnapshot, split_amount};
use crate::core::errors::BillSplitError;
use crate::core::models::{Expense, ExpenseSummary, Member, MemberGroup, MemberId, Settlement};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn file_name(self, date: DateTime<Utc>) -> String {
        let ext = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        };
        format!("expenses-{}.{}", date.format("%Y-%m-%d"), ext)
    }
}

impl FromStr for ExportFormat {
    type Err = BillSplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(BillSplitError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Everything a report is built from.
pub struct ExportInput<'a> {
    pub members: &'a [Member],
    pub expenses: &'a [Expense],
    pub groups: &'a [MemberGroup],
    pub snapshot: &'a SessionSnapshot,
    pub generated_at: DateTime<Utc>,
}

impl ExportInput<'_> {
    fn member_name(&self, id: MemberId) -> String {
        self.members
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.clone())
            .unwrap_or_default()
    }

    /// Group name when the side is a real group, else the member's name.
    fn party_name(&self, member_id: MemberId, group_id: Option<&str>) -> String {
        group_id
            .and_then(|gid| self.groups.iter().find(|g| g.id == gid))
            .map(|g| g.name.clone())
            .unwrap_or_else(|| self.member_name(member_id))
    }

    fn settlement_parties(&self, settlement: &Settlement) -> (String, String) {
        (
            self.party_name(settlement.from_id, settlement.from_group_id.as_deref()),
            self.party_name(settlement.to_id, settlement.to_group_id.as_deref()),
        )
    }
}

pub fn export(input: &ExportInput<'_>, format: ExportFormat) -> Result<String, BillSplitError> {
    match format {
        ExportFormat::Csv => to_csv(input),
        ExportFormat::Json => to_json(input),
    }
}

/// Expense ledger with one share column per member, a totals row and the
/// settlement table underneath.
pub fn to_csv(input: &ExportInput<'_>) -> Result<String, BillSplitError> {
    let csv_err = |e: csv::Error| BillSplitError::ExportError(e.to_string());
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());

    let mut header = vec!["Expense".to_string(), "Amount".to_string(), "Payer".to_string()];
    header.extend(input.members.iter().map(|m| m.name.clone()));
    header.push("Date".to_string());
    wtr.write_record(&header).map_err(csv_err)?;

    let mut member_totals = vec![0i64; input.members.len()];
    for expense in input.expenses {
        let mut row = vec![
            expense.name.clone(),
            expense.amount.to_string(),
            input.member_name(expense.payer_id),
        ];
        for (i, member) in input.members.iter().enumerate() {
            let share = split_amount(expense, member.id, input.members);
            member_totals[i] += share;
            row.push(share.to_string());
        }
        row.push(expense.created_at.format("%Y-%m-%d").to_string());
        wtr.write_record(&row).map_err(csv_err)?;
    }

    let mut total_row = vec![
        "TOTAL".to_string(),
        input.snapshot.summary.total_amount.to_string(),
        String::new(),
    ];
    total_row.extend(member_totals.iter().map(|t| t.to_string()));
    wtr.write_record(&total_row).map_err(csv_err)?;

    wtr.write_record([""]).map_err(csv_err)?;
    wtr.write_record(["SETTLEMENTS"]).map_err(csv_err)?;
    wtr.write_record(["From", "To", "Amount"]).map_err(csv_err)?;
    for settlement in &input.snapshot.settlements {
        let (from, to) = input.settlement_parties(settlement);
        wtr.write_record([from, to, settlement.amount.to_string()])
            .map_err(csv_err)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| BillSplitError::ExportError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| BillSplitError::ExportError(e.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport {
    date: String,
    expenses: Vec<JsonExpense>,
    total_amount: i64,
    members: Vec<JsonMember>,
    settlements: Vec<JsonSettlement>,
    summary: ExpenseSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExpense {
    name: String,
    amount: i64,
    payer: String,
    participants: Vec<JsonShare>,
    is_custom_split: bool,
    date: String,
}

#[derive(Serialize)]
struct JsonShare {
    name: String,
    amount: i64,
}

#[derive(Serialize)]
struct JsonMember {
    name: String,
    slots: u32,
    balance: f64,
}

#[derive(Serialize)]
struct JsonSettlement {
    from: String,
    to: String,
    amount: i64,
}

pub fn to_json(input: &ExportInput<'_>) -> Result<String, BillSplitError> {
    let report = JsonReport {
        date: input.generated_at.format("%Y-%m-%d").to_string(),
        expenses: input
            .expenses
            .iter()
            .map(|e| JsonExpense {
                name: e.name.clone(),
                amount: e.amount,
                payer: input.member_name(e.payer_id),
                participants: e
                    .participants
                    .iter()
                    .map(|&p| JsonShare {
                        name: input.member_name(p),
                        amount: split_amount(e, p, input.members),
                    })
                    .collect(),
                is_custom_split: e.is_custom_split,
                date: e.created_at.format("%Y-%m-%d").to_string(),
            })
            .collect(),
        total_amount: input.snapshot.summary.total_amount,
        members: input
            .members
            .iter()
            .map(|m| JsonMember {
                name: m.name.clone(),
                slots: m.slots,
                balance: input
                    .snapshot
                    .balances
                    .iter()
                    .find(|b| b.member_id == m.id)
                    .map(|b| b.balance)
                    .unwrap_or(0.0),
            })
            .collect(),
        settlements: input
            .snapshot
            .settlements
            .iter()
            .map(|s| {
                let (from, to) = input.settlement_parties(s);
                JsonSettlement {
                    from,
                    to,
                    amount: s.amount,
                }
            })
            .collect(),
        summary: input.snapshot.summary.clone(),
    };

    serde_json::to_string_pretty(&report).map_err(|e| BillSplitError::ExportError(e.to_string()))
}
