use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::error::BudgetError;

/// Format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// "Income" / "Expense", used in confirmation messages.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// Exact match against the stored column value, the same comparison the
    /// aggregation queries use (`type = 'expense'`).
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TransactionType::Income => TransactionType::Expense,
            TransactionType::Expense => TransactionType::Income,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(BudgetError::InvalidType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDateTime,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
}

/// A transaction before the store has assigned its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
            amount,
            transaction_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!(" Expense ".parse::<TransactionType>().unwrap(), TransactionType::Expense);
    }

    #[test]
    fn test_transaction_type_rejects_unknown() {
        let result = "refund".parse::<TransactionType>();
        assert!(matches!(result, Err(BudgetError::InvalidType(ref t)) if t == "refund"));
    }

    #[test]
    fn test_from_stored_is_exact() {
        assert_eq!(TransactionType::from_stored("expense"), Some(TransactionType::Expense));
        assert_eq!(TransactionType::from_stored("Expense"), None);
        assert_eq!(TransactionType::from_stored(" income"), None);
    }

    #[test]
    fn test_transaction_type_toggle() {
        assert_eq!(TransactionType::Income.toggle(), TransactionType::Expense);
        assert_eq!(TransactionType::Expense.toggle(), TransactionType::Income);
    }
}
