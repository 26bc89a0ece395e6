use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::account::BankAccount;
use crate::models::budget::Budget;
use crate::models::dream::DreamAccount;
use crate::models::report::{
    BudgetComparison, CategoryTotal, DashboardSummary, DreamProgress, MonthlyTotals,
};
use crate::models::state::FinanceState;
use crate::models::transaction::{Category, Transaction, TransactionType};

/// Label shown for a transaction whose account no longer exists.
pub const UNKNOWN_ACCOUNT: &str = "Unknown account";

const RECENT_TRANSACTIONS: usize = 5;
const FEATURED_DREAMS: usize = 2;

/// Read-side aggregates for the overview and report screens.
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of all account balances.
    pub fn total_balance(&self, accounts: &[BankAccount]) -> Decimal {
        accounts.iter().map(|a| a.balance).sum()
    }

    /// Income and expense booked in the calendar month containing `day`.
    pub fn monthly_totals(&self, transactions: &[Transaction], day: NaiveDate) -> MonthlyTotals {
        transactions
            .iter()
            .filter(|t| t.date.year() == day.year() && t.date.month() == day.month())
            .fold(MonthlyTotals::default(), |mut totals, t| {
                match t.transaction_type {
                    TransactionType::Income => totals.income += t.amount,
                    TransactionType::Expense => totals.expense += t.amount,
                }
                totals
            })
    }

    pub fn dashboard(&self, state: &FinanceState, today: NaiveDate) -> DashboardSummary {
        let month = self.monthly_totals(&state.transactions, today);
        DashboardSummary {
            total_balance: self.total_balance(&state.accounts),
            spending_ratio: month.spending_ratio(),
            month,
            recent_transactions: state
                .transactions
                .iter()
                .take(RECENT_TRANSACTIONS)
                .cloned()
                .collect(),
            featured_dreams: state
                .dreams
                .iter()
                .take(FEATURED_DREAMS)
                .map(|d| DreamProgress {
                    dream: d.clone(),
                    percent: d.progress_percent(),
                })
                .collect(),
        }
    }

    /// Expense total per category, in category order, zero totals omitted.
    pub fn expense_by_category(&self, transactions: &[Transaction]) -> Vec<CategoryTotal> {
        Category::ALL
            .into_iter()
            .map(|category| CategoryTotal {
                category,
                amount: expense_total(transactions, category),
            })
            .filter(|t| t.amount > Decimal::ZERO)
            .collect()
    }

    /// Each budget next to the expenses recorded in its category.
    pub fn budget_comparison(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
    ) -> Vec<BudgetComparison> {
        budgets
            .iter()
            .map(|b| BudgetComparison {
                category: b.category,
                limit: b.limit,
                spent: expense_total(transactions, b.category),
            })
            .collect()
    }

    /// Display name of the account a transaction belongs to.
    pub fn account_label<'a>(
        &self,
        transaction: &Transaction,
        accounts: &'a [BankAccount],
    ) -> &'a str {
        accounts
            .iter()
            .find(|a| a.id == transaction.account_id)
            .map_or(UNKNOWN_ACCOUNT, |a| a.name.as_str())
    }

    /// Goals sorted by how close they are to their target, closest first.
    pub fn dreams_by_progress<'a>(&self, dreams: &'a [DreamAccount]) -> Vec<&'a DreamAccount> {
        let mut sorted: Vec<&DreamAccount> = dreams.iter().collect();
        sorted.sort_by(|a, b| b.progress_percent().cmp(&a.progress_percent()));
        sorted
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

fn expense_total(transactions: &[Transaction], category: Category) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.category == category && t.transaction_type == TransactionType::Expense)
        .map(|t| t.amount)
        .sum()
}
