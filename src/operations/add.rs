use crate::db::repository;
use crate::error::{BudgetError, Result};
use crate::models::transaction::{NewTransaction, TransactionType};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::str::FromStr;
use tracing::warn;

/// Largest amount a single transaction may carry. Totals of many such amounts
/// stay well inside what the REAL column converts back into a `Decimal`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Validates raw user input and builds the insert payload.
/// Category and description are kept exactly as entered.
pub fn create_transaction(
    category: &str,
    description: &str,
    amount: &str,
    transaction_type: &str,
) -> Result<NewTransaction> {
    let category = required("category", category)?;
    let description = required("description", description)?;
    let amount = required("amount", amount)?.trim();
    let transaction_type = required("type", transaction_type)?;

    let amount = Decimal::from_str(amount)
        .map_err(|_| BudgetError::InvalidAmount(amount.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(BudgetError::NonPositiveAmount(amount.to_string()));
    }
    let round_trips = amount.to_f64().and_then(Decimal::from_f64).is_some();
    if amount > MAX_AMOUNT || !round_trips {
        return Err(BudgetError::AmountTooLarge {
            amount: amount.to_string(),
            limit: MAX_AMOUNT.to_string(),
        });
    }

    let transaction_type = TransactionType::from_str(transaction_type)?;

    Ok(NewTransaction::new(category, description, amount, transaction_type))
}

pub fn add_transaction_to_db(
    conn: &Connection,
    category: &str,
    description: &str,
    amount: &str,
    transaction_type: &str,
) -> Result<i64> {
    let transaction = create_transaction(category, description, amount, transaction_type)
        .inspect_err(|e| warn!(error = %e, "rejected transaction input"))?;
    repository::add_transaction(conn, &transaction)
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(BudgetError::MissingField(field));
    }
    Ok(value)
}
