use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;
use crate::remote::traits::Document;

use super::account::BankAccount;
use super::budget::Budget;
use super::dream::DreamAccount;
use super::seed;
use super::transaction::Transaction;

/// The four collections a user owns. This is both the in-memory snapshot
/// and the shape of the per-user remote document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinanceState {
    pub accounts: Vec<BankAccount>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub dreams: Vec<DreamAccount>,
}

impl FinanceState {
    /// The demo collections every new user starts with.
    pub fn seed() -> Self {
        Self {
            accounts: seed::initial_accounts(),
            transactions: seed::initial_transactions(),
            budgets: seed::initial_budgets(),
            dreams: seed::initial_dreams(),
        }
    }

    /// Decode a stored document. A field that is absent or cannot be decoded
    /// falls back to its seed collection; other fields are unaffected.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            accounts: decode_field(doc, Field::Accounts).unwrap_or_else(seed::initial_accounts),
            transactions: decode_field(doc, Field::Transactions)
                .unwrap_or_else(seed::initial_transactions),
            budgets: decode_field(doc, Field::Budgets).unwrap_or_else(seed::initial_budgets),
            dreams: decode_field(doc, Field::Dreams).unwrap_or_else(seed::initial_dreams),
        }
    }

    /// Encode all four collections as a document.
    pub fn to_document(&self) -> Result<Document, CoreError> {
        let mut doc = Document::new();
        for update in self.clone().into_updates() {
            doc.insert(update.field().as_str().to_string(), update.to_json()?);
        }
        Ok(doc)
    }

    /// Split into one update per field, in [`Field::ALL`] order.
    pub fn into_updates(self) -> Vec<FieldUpdate> {
        vec![
            FieldUpdate::Accounts(self.accounts),
            FieldUpdate::Transactions(self.transactions),
            FieldUpdate::Budgets(self.budgets),
            FieldUpdate::Dreams(self.dreams),
        ]
    }

    /// Replace one collection with the value carried by `update`.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Accounts(v) => self.accounts = v,
            FieldUpdate::Transactions(v) => self.transactions = v,
            FieldUpdate::Budgets(v) => self.budgets = v,
            FieldUpdate::Dreams(v) => self.dreams = v,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.transactions.is_empty()
            && self.budgets.is_empty()
            && self.dreams.is_empty()
    }
}

fn decode_field<T: DeserializeOwned>(doc: &Document, field: Field) -> Option<T> {
    let value = doc.get(field.as_str())?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("stored '{}' could not be decoded, using seed data: {e}", field.as_str());
            None
        }
    }
}

/// Top-level field of the user document / local storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Accounts,
    Transactions,
    Budgets,
    Dreams,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Accounts,
        Field::Transactions,
        Field::Budgets,
        Field::Dreams,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Accounts => "accounts",
            Field::Transactions => "transactions",
            Field::Budgets => "budgets",
            Field::Dreams => "dreams",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown field '{s}'")))
    }
}

/// A field together with its complete new value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Accounts(Vec<BankAccount>),
    Transactions(Vec<Transaction>),
    Budgets(Vec<Budget>),
    Dreams(Vec<DreamAccount>),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Accounts(_) => Field::Accounts,
            FieldUpdate::Transactions(_) => Field::Transactions,
            FieldUpdate::Budgets(_) => Field::Budgets,
            FieldUpdate::Dreams(_) => Field::Dreams,
        }
    }

    pub fn to_json(&self) -> Result<Value, CoreError> {
        let value = match self {
            FieldUpdate::Accounts(v) => serde_json::to_value(v),
            FieldUpdate::Transactions(v) => serde_json::to_value(v),
            FieldUpdate::Budgets(v) => serde_json::to_value(v),
            FieldUpdate::Dreams(v) => serde_json::to_value(v),
        };
        value.map_err(|e| {
            CoreError::Serialization(format!("Failed to encode '{}': {e}", self.field()))
        })
    }
}
