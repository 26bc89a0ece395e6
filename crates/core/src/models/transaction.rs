use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money coming into the account
    Income,
    /// Money leaving the account
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

/// Spending/income category.
///
/// Stored under the labels the web client writes into user documents,
/// so documents created by either client decode the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "飲食")]
    Food,
    #[serde(rename = "交通")]
    Transport,
    #[serde(rename = "住屋")]
    Housing,
    #[serde(rename = "娛樂")]
    Entertainment,
    #[serde(rename = "購物")]
    Shopping,
    #[serde(rename = "薪資")]
    Salary,
    #[serde(rename = "投資")]
    Investment,
    #[serde(rename = "其他")]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Entertainment,
        Category::Shopping,
        Category::Salary,
        Category::Investment,
        Category::Other,
    ];

    /// Categories a spending budget can be set for (income categories excluded).
    pub fn budgetable() -> Vec<Category> {
        Self::ALL
            .into_iter()
            .filter(|c| !matches!(c, Category::Salary | Category::Investment))
            .collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Housing => "Housing",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Salary => "Salary",
            Category::Investment => "Investment",
            Category::Other => "Other",
        };
        write!(f, "{label}")
    }
}

/// A recorded income or expense.
///
/// Immutable once posted; the only lifecycle change is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    /// Account the money moved in or out of
    pub account_id: String,

    /// Always positive; direction comes from `transaction_type`
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub category: Category,

    pub description: String,

    /// Booking date (daily granularity)
    pub date: NaiveDate,
}

impl Transaction {
    /// Signed effect of this transaction on its account's balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Input for posting a transaction (everything except the id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_id: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn expense(
        account_id: impl Into<String>,
        amount: Decimal,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
            transaction_type: TransactionType::Expense,
            category,
            description: description.into(),
            date,
        }
    }

    pub fn income(
        account_id: impl Into<String>,
        amount: Decimal,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
            transaction_type: TransactionType::Income,
            category,
            description: description.into(),
            date,
        }
    }

    pub(crate) fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            account_id: self.account_id,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
            description: self.description,
            date: self.date,
        }
    }
}
