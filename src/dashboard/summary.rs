//! Income/expense totals derived from transaction records.

use serde::Serialize;

use crate::dashboard::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
}

impl FinancialSummary {
    /// Sums `amount` over transactions. Rows typed `income` add to income,
    /// every other row counts as an expense.
    pub fn from_transactions(transactions: &[Record]) -> Self {
        let mut summary = Self::default();

        for record in transactions {
            let amount = amount_of(record);
            if record.data["type"] == "income" {
                summary.total_income += amount;
            } else {
                summary.total_expenses += amount;
            }
        }

        summary.balance = summary.total_income - summary.total_expenses;
        summary
    }
}

/// Amount as a number; numeric strings are accepted, anything else is zero.
fn amount_of(record: &Record) -> f64 {
    match &record.data["amount"] {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
