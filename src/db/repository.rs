use crate::error::{BudgetError, Result};
use crate::models::transaction::{NewTransaction, Transaction, TransactionType, DATE_FORMAT};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tracing::debug;

/// Appends a transaction stamped with the current local time and returns its id.
pub fn add_transaction(conn: &Connection, transaction: &NewTransaction) -> Result<i64> {
    add_transaction_at(conn, transaction, Local::now().naive_local())
}

pub fn add_transaction_at(
    conn: &Connection,
    transaction: &NewTransaction,
    date: NaiveDateTime,
) -> Result<i64> {
    let amount = transaction
        .amount
        .to_f64()
        .filter(|value| decimal_from_real(*value).is_some())
        .ok_or_else(|| BudgetError::AmountTooLarge {
            amount: transaction.amount.to_string(),
            limit: Decimal::MAX.to_string(),
        })?;

    conn.execute(
        "INSERT INTO transactions (date, category, description, amount, type) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            date.format(DATE_FORMAT).to_string(),
            &transaction.category,
            &transaction.description,
            amount,
            transaction.transaction_type.as_str(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(id, category = %transaction.category, kind = %transaction.transaction_type, "inserted transaction");
    Ok(id)
}

/// All transactions in insertion order.
pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, category, description, amount, type FROM transactions ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], StoredRow::from_row)?;

    let mut transactions = Vec::new();
    for row in rows {
        transactions.push(row?.into_transaction()?);
    }
    debug!(count = transactions.len(), "loaded transactions");
    Ok(transactions)
}

/// `None` when the REAL value has no `Decimal` counterpart (out of range or not finite).
pub(crate) fn decimal_from_real(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.normalize())
}

struct StoredRow {
    id: i64,
    date: String,
    category: String,
    description: String,
    amount: f64,
    transaction_type: String,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            category: row.get(2)?,
            description: row.get(3)?,
            amount: row.get(4)?,
            transaction_type: row.get(5)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction> {
        let id = self.id;
        let date = NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|_| BudgetError::StoredTimestamp { id, value: self.date.clone() })?;
        let transaction_type = TransactionType::from_stored(&self.transaction_type)
            .ok_or_else(|| BudgetError::UnknownStoredType { id, value: self.transaction_type.clone() })?;
        let amount = decimal_from_real(self.amount)
            .ok_or(BudgetError::StoredAmount { id, value: self.amount })?;

        Ok(Transaction {
            id,
            date,
            category: self.category,
            description: self.description,
            amount,
            transaction_type,
        })
    }
}
