//! Demo data written for a brand-new user, and used as the per-field
//! fallback when a stored collection is missing.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::account::BankAccount;
use super::budget::Budget;
use super::dream::DreamAccount;
use super::transaction::{Category, Transaction, TransactionType};

fn account(id: &str, name: &str, bank_name: &str, balance: i64, color: &str) -> BankAccount {
    BankAccount {
        id: id.into(),
        name: name.into(),
        bank_name: bank_name.into(),
        balance: Decimal::from(balance),
        color: color.into(),
    }
}

fn transaction(
    id: &str,
    account_id: &str,
    amount: i64,
    transaction_type: TransactionType,
    category: Category,
    description: &str,
    (y, m, d): (i32, u32, u32),
) -> Transaction {
    Transaction {
        id: id.into(),
        account_id: account_id.into(),
        amount: Decimal::from(amount),
        transaction_type,
        category,
        description: description.into(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    }
}

fn dream(
    id: &str,
    title: &str,
    target: i64,
    current: i64,
    icon: &str,
    color: &str,
) -> DreamAccount {
    DreamAccount {
        id: id.into(),
        title: title.into(),
        target_amount: Decimal::from(target),
        current_amount: Decimal::from(current),
        icon: icon.into(),
        color: color.into(),
    }
}

pub fn initial_accounts() -> Vec<BankAccount> {
    vec![
        account("1", "Main Account", "Cathay United Bank", 50_000, "bg-emerald-500"),
        account("2", "Digital Account", "Taishin Richart", 12_000, "bg-blue-500"),
        account("3", "Daily Wallet", "Cash", 3_500, "bg-amber-500"),
    ]
}

pub fn initial_transactions() -> Vec<Transaction> {
    use Category::*;
    use TransactionType::*;
    vec![
        transaction("t1", "1", 45_000, Income, Salary, "December salary", (2023, 12, 5)),
        transaction("t2", "1", 120, Expense, Food, "Lunch", (2023, 12, 6)),
        transaction("t3", "3", 50, Expense, Transport, "Metro", (2023, 12, 6)),
        transaction("t4", "2", 2_000, Expense, Shopping, "Christmas gifts", (2023, 12, 7)),
    ]
}

pub fn initial_budgets() -> Vec<Budget> {
    vec![
        Budget::new(Category::Food, Decimal::from(12_000)),
        Budget::new(Category::Transport, Decimal::from(3_000)),
        Budget::new(Category::Entertainment, Decimal::from(5_000)),
    ]
}

pub fn initial_dreams() -> Vec<DreamAccount> {
    vec![
        dream("d1", "Kyoto trip", 60_000, 15_000, "✈️", "bg-rose-500"),
        dream("d2", "Christmas dinner", 5_000, 2_400, "🎄", "bg-emerald-600"),
        dream("d3", "New phone", 35_000, 8_000, "📱", "bg-indigo-500"),
    ]
}
