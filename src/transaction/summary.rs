//! Totals of a user's transactions grouped by type and category.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::transaction::domain::{CategoryName, TransactionType};

/// The total of all transactions that share a type and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The shared category.
    pub category: CategoryName,
    /// The shared transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The sum of the transaction amounts.
    pub total: f64,
    /// The number of transactions in the group.
    pub count: u64,
}

/// Income and expense totals for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub net: f64,
    /// Totals per type and category.
    ///
    /// Income groups come first, then expense groups. Within a type, larger
    /// totals come first and ties are ordered by category name.
    pub categories: Vec<CategoryTotal>,
}

impl TransactionSummary {
    /// Build a summary from per-category totals.
    pub(crate) fn from_category_totals(mut categories: Vec<CategoryTotal>) -> Self {
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;

        for category in &categories {
            match category.transaction_type {
                TransactionType::Income => total_income += category.total,
                TransactionType::Expense => total_expenses += category.total,
            }
        }

        categories.sort_by(compare_category_totals);

        Self {
            total_income,
            total_expenses,
            net: total_income - total_expenses,
            categories,
        }
    }
}

fn compare_category_totals(a: &CategoryTotal, b: &CategoryTotal) -> Ordering {
    a.transaction_type
        .cmp(&b.transaction_type)
        .then_with(|| b.total.total_cmp(&a.total))
        .then_with(|| a.category.cmp(&b.category))
}
