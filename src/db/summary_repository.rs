use crate::db::repository::decimal_from_real;
use crate::error::{BudgetError, Result};
use crate::models::summary::MonthlySummary;
use crate::models::transaction::TransactionType;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::debug;

/// Total expense amount per category, ordered by category name.
/// Categories without expense rows do not appear.
pub fn spending_by_category(conn: &Connection) -> Result<Vec<(String, Decimal)>> {
    let mut stmt = conn.prepare(
        "SELECT category, SUM(amount) FROM transactions
         WHERE type = 'expense'
         GROUP BY category
         ORDER BY category ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        let category: String = row.get(0)?;
        let total: f64 = row.get(1)?;
        Ok((category, total))
    })?;

    let mut totals = Vec::new();
    for row in rows {
        let (category, total) = row?;
        let total = decimal_from_real(total).ok_or(BudgetError::TotalOutOfRange(total))?;
        totals.push((category, total));
    }
    debug!(categories = totals.len(), "computed spending by category");
    Ok(totals)
}

/// Income and expense totals for rows whose date has exactly this month (`MM`) and year (`YYYY`).
/// Inputs are compared as strings, so anything not in that shape matches nothing.
pub fn monthly_summary(conn: &Connection, month: &str, year: &str) -> Result<MonthlySummary> {
    let income = total_for_month(conn, TransactionType::Income, month, year)?;
    let expenses = total_for_month(conn, TransactionType::Expense, month, year)?;
    debug!(month, year, %income, %expenses, "computed monthly summary");
    Ok(MonthlySummary { income, expenses })
}

fn total_for_month(
    conn: &Connection,
    transaction_type: TransactionType,
    month: &str,
    year: &str,
) -> Result<Decimal> {
    let total: f64 = conn.query_row(
        "SELECT IFNULL(SUM(amount), 0.0) FROM transactions
         WHERE type = ?1 AND strftime('%Y', date) = ?2 AND strftime('%m', date) = ?3",
        [transaction_type.as_str(), year, month],
        |row| row.get(0),
    )?;
    decimal_from_real(total).ok_or(BudgetError::TotalOutOfRange(total))
}
