use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("All fields are required. Missing: {0}")]
    MissingField(&'static str),

    #[error("Invalid amount '{0}'. Please provide a valid decimal number.")]
    InvalidAmount(String),

    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(String),

    #[error("Amount {amount} is too large, the limit is {limit}")]
    AmountTooLarge { amount: String, limit: String },

    #[error("Invalid transaction type '{0}'. Use 'income' or 'expense'.")]
    InvalidType(String),

    #[error("Stored transaction {id} has unknown type '{value}'")]
    UnknownStoredType { id: i64, value: String },

    #[error("Stored transaction {id} has unreadable timestamp '{value}'")]
    StoredTimestamp { id: i64, value: String },

    #[error("Stored transaction {id} has unreadable amount {value}")]
    StoredAmount { id: i64, value: f64 },

    #[error("Total {0} is outside the range of representable amounts")]
    TotalOutOfRange(f64),
}

impl BudgetError {
    /// Rejected input or unreadable stored data. The front ends report these and carry on;
    /// database and I/O failures end the process.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BudgetError::Database(_) | BudgetError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_recoverable() {
        assert!(BudgetError::MissingField("amount").is_recoverable());
        assert!(BudgetError::TotalOutOfRange(1e30).is_recoverable());
        assert!(
            BudgetError::UnknownStoredType { id: 1, value: "refund".to_string() }.is_recoverable()
        );
        assert!(!BudgetError::Io(std::io::Error::other("disk gone")).is_recoverable());
        assert!(!BudgetError::Database(rusqlite::Error::QueryReturnedNoRows).is_recoverable());
    }
}
