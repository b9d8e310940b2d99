use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlySummary {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl MonthlySummary {
    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// One slice of the spending pie.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percent: f64,
}
