use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Color tags handed out to new accounts, cycling by account count.
pub const ACCOUNT_COLORS: [&str; 5] = [
    "bg-emerald-500",
    "bg-blue-500",
    "bg-indigo-500",
    "bg-purple-500",
    "bg-amber-500",
];

/// A bank account or wallet.
///
/// `balance` is only ever changed by posting a transaction; it is set
/// directly once, when the account is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    /// Display name (e.g., "Main Account")
    pub name: String,
    /// Institution name (e.g., "Cash", "Taishin Richart")
    pub bank_name: String,
    /// Signed balance
    pub balance: Decimal,
    /// Display color tag
    pub color: String,
}

/// Input for opening a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub bank_name: String,
    pub opening_balance: Decimal,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        bank_name: impl Into<String>,
        opening_balance: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            bank_name: bank_name.into(),
            opening_balance,
        }
    }
}
