use crate::models::summary::MonthlySummary;
use crate::models::transaction::{Transaction, DATE_FORMAT};
use rust_decimal::Decimal;
use std::fmt::Write;

pub fn format_transaction(transaction: &Transaction) -> String {
    format!(
        "ID: {}, Date: {}, Category: {}, Description: {}, Amount: {:.2}, Type: {}",
        transaction.id,
        transaction.date.format(DATE_FORMAT),
        transaction.category,
        transaction.description,
        transaction.amount,
        transaction.transaction_type,
    )
}

pub fn format_transaction_history(transactions: &[Transaction]) -> String {
    let mut out = String::from("\n--- Transaction History ---\n");
    for transaction in transactions {
        out.push_str(&format_transaction(transaction));
        out.push('\n');
    }
    out
}

pub fn format_spending_by_category(totals: &[(String, Decimal)]) -> String {
    let mut out = String::from("\n--- Spending by Category ---\n");
    for (category, total) in totals {
        let _ = writeln!(out, "{}: ${:.2}", category, total);
    }
    out
}

pub fn format_monthly_summary(month: &str, year: &str, summary: &MonthlySummary) -> String {
    format!(
        "\n--- Summary for {}/{} ---\nTotal Income: ${:.2}\nTotal Expenses: ${:.2}\nNet Savings: ${:.2}\n",
        month,
        year,
        summary.income,
        summary.expenses,
        summary.net(),
    )
}
