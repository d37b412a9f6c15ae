use crate::core::models::{CategoryTotal, Expense, ExpenseSummary};
use std::collections::HashMap;

/// Totals, count, largest expense and per-name sums (largest first).
///
/// The category of an expense is its exact name. On equal amounts the first
/// expense, and the first-seen category, wins.
pub fn compute_summary(expenses: &[Expense]) -> ExpenseSummary {
    let mut total_amount = 0;
    let mut largest: Option<&Expense> = None;
    let mut categories: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for expense in expenses {
        total_amount += expense.amount;

        if largest.is_none_or(|l| expense.amount > l.amount) {
            largest = Some(expense);
        }

        match index.get(expense.name.as_str()) {
            Some(&i) => categories[i].amount += expense.amount,
            None => {
                index.insert(expense.name.as_str(), categories.len());
                categories.push(CategoryTotal {
                    name: expense.name.clone(),
                    amount: expense.amount,
                });
            }
        }
    }

    categories.sort_by(|a, b| b.amount.cmp(&a.amount));

    ExpenseSummary {
        total_amount,
        expense_count: expenses.len(),
        largest_expense: largest.map(|e| CategoryTotal {
            name: e.name.clone(),
            amount: e.amount,
        }),
        expenses_by_category: categories,
    }
}
