use rust_decimal::Decimal;
use serde::Serialize;

use super::dream::DreamAccount;
use super::transaction::{Category, Transaction};

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthlyTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyTotals {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }

    /// Expense as a percentage of income, capped at 100.
    /// A month without income is measured against 1.
    pub fn spending_ratio(&self) -> Decimal {
        let base = if self.income.is_zero() { Decimal::ONE } else { self.income };
        (self.expense / base * Decimal::ONE_HUNDRED)
            .min(Decimal::ONE_HUNDRED)
            .round_dp(2)
    }
}

/// Summary shown on the overview screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_balance: Decimal,
    pub month: MonthlyTotals,
    pub spending_ratio: Decimal,
    /// Most recent transactions, newest first
    pub recent_transactions: Vec<Transaction>,
    pub featured_dreams: Vec<DreamProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DreamProgress {
    pub dream: DreamAccount,
    pub percent: Decimal,
}

/// Expense total for a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: Decimal,
}

/// Budget limit against what was actually spent in its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    pub category: Category,
    pub limit: Decimal,
    pub spent: Decimal,
}

impl BudgetComparison {
    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }

    pub fn remaining(&self) -> Decimal {
        self.limit - self.spent
    }
}
