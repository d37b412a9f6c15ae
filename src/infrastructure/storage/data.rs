use crate::core::models::{Expense, ExpenseUpdate, Member, MemberId, NewExpense, NewMember, Session, DEFAULT_SLOTS};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub session_id: i64,
    pub member_id: i64,
    pub expense_id: i64,
}

impl Default for Counters {
    fn default() -> Self {
        Counters {
            session_id: 1,
            member_id: 1,
            expense_id: 1,
        }
    }
}

/// The whole persisted data set, shared by the in-memory and file stores.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    pub sessions: Vec<Session>,
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
    pub counters: Counters,
}

impl StoreData {
    pub fn create_session(&mut self, code: String) -> Session {
        let session = Session {
            id: self.counters.session_id,
            code,
            created_at: Utc::now(),
            groups: Vec::new(),
            grouping_enabled: false,
            settlements: Vec::new(),
        };
        self.counters.session_id += 1;
        self.sessions.push(session.clone());
        session
    }

    pub fn session_by_code(&self, code: &str) -> Option<Session> {
        self.sessions.iter().find(|s| s.code == code).cloned()
    }

    pub fn save_session(&mut self, session: Session) {
        match self.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session,
            None => self.sessions.push(session),
        }
    }

    pub fn members(&self, session_id: i64) -> Vec<Member> {
        self.members
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn member(&self, member_id: MemberId) -> Option<Member> {
        self.members.iter().find(|m| m.id == member_id).cloned()
    }

    pub fn create_member(&mut self, session_id: i64, member: NewMember) -> Member {
        let member = Member {
            id: self.counters.member_id,
            session_id,
            name: member.name,
            slots: member.slots.unwrap_or(DEFAULT_SLOTS),
        };
        self.counters.member_id += 1;
        self.members.push(member.clone());
        member
    }

    pub fn save_member(&mut self, member: Member) {
        match self.members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member,
            None => self.members.push(member),
        }
    }

    pub fn delete_member(&mut self, member_id: MemberId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.id != member_id);
        if self.members.len() == before {
            return false;
        }

        self.expenses.retain(|e| e.payer_id != member_id);
        for expense in &mut self.expenses {
            if !expense.participants.remove(&member_id) {
                continue;
            }
            // The remaining custom shares no longer add up to the amount.
            if expense.is_custom_split {
                expense.is_custom_split = false;
                expense.custom_amounts.clear();
            }
        }
        true
    }

    pub fn expenses(&self, session_id: i64) -> Vec<Expense> {
        self.expenses
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn expense(&self, expense_id: i64) -> Option<Expense> {
        self.expenses.iter().find(|e| e.id == expense_id).cloned()
    }

    pub fn create_expense(&mut self, session_id: i64, expense: NewExpense) -> Expense {
        let expense = Expense {
            id: self.counters.expense_id,
            session_id,
            name: expense.name,
            amount: expense.amount,
            payer_id: expense.payer_id,
            participants: expense.participants,
            is_custom_split: expense.is_custom_split,
            custom_amounts: expense.custom_amounts,
            created_at: Utc::now(),
        };
        self.counters.expense_id += 1;
        self.expenses.push(expense.clone());
        expense
    }

    pub fn update_expense(&mut self, expense_id: i64, update: ExpenseUpdate) -> Option<Expense> {
        let expense = self.expenses.iter_mut().find(|e| e.id == expense_id)?;
        expense.apply(update);
        Some(expense.clone())
    }

    pub fn delete_expense(&mut self, expense_id: i64) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != expense_id);
        self.expenses.len() != before
    }
}
