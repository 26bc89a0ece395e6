use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::account::{BankAccount, NewAccount, ACCOUNT_COLORS};
use crate::models::budget::Budget;
use crate::models::dream::{DreamAccount, NewDream, DEFAULT_DREAM_ICON, DREAM_COLORS};
use crate::models::state::{FieldUpdate, FinanceState};
use crate::models::transaction::{Category, NewTransaction, Transaction};

/// Result of posting a transaction: the new record plus both collections
/// it touches, to be written together.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPosting {
    pub transaction: Transaction,
    pub transactions: Vec<Transaction>,
    pub accounts: Vec<BankAccount>,
}

impl TransactionPosting {
    pub fn into_updates(self) -> Vec<FieldUpdate> {
        vec![
            FieldUpdate::Transactions(self.transactions),
            FieldUpdate::Accounts(self.accounts),
        ]
    }
}

/// Computes new collection values for every ledger mutation.
///
/// Pure business logic, no I/O. Callers hand the results to the
/// mutation coordinator.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Post a transaction: prepend it (newest first) and move the owning
    /// account's balance by +amount for income, −amount for expense.
    /// Other accounts are untouched; an unknown account id changes no balance.
    pub fn post_transaction(
        &self,
        state: &FinanceState,
        input: NewTransaction,
    ) -> Result<TransactionPosting, CoreError> {
        if input.amount <= Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Transaction amount must be positive".into(),
            ));
        }

        let transaction = input.into_transaction(new_id());
        let delta = transaction.signed_amount();

        let mut transactions = Vec::with_capacity(state.transactions.len() + 1);
        transactions.push(transaction.clone());
        transactions.extend(state.transactions.iter().cloned());

        let accounts = state
            .accounts
            .iter()
            .map(|acc| {
                if acc.id == transaction.account_id {
                    BankAccount {
                        balance: acc.balance + delta,
                        ..acc.clone()
                    }
                } else {
                    acc.clone()
                }
            })
            .collect();

        Ok(TransactionPosting {
            transaction,
            transactions,
            accounts,
        })
    }

    /// Drop the transaction with `id`. Missing ids are a no-op.
    ///
    /// Balances are NOT reversed: the account keeps the effect of the deleted
    /// transaction.
    pub fn remove_transaction(&self, transactions: &[Transaction], id: &str) -> Vec<Transaction> {
        transactions.iter().filter(|t| t.id != id).cloned().collect()
    }

    /// Set the monthly limit for `category`, creating the entry if absent.
    pub fn upsert_budget(
        &self,
        budgets: &[Budget],
        category: Category,
        limit: Decimal,
    ) -> Result<Vec<Budget>, CoreError> {
        if limit < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Budget limit for {category} must not be negative"
            )));
        }
        let mut updated = budgets.to_vec();
        match updated.iter_mut().find(|b| b.category == category) {
            Some(existing) => existing.limit = limit,
            None => updated.push(Budget::new(category, limit)),
        }
        Ok(updated)
    }

    /// Append a new account with a palette color picked by account count.
    pub fn open_account(
        &self,
        accounts: &[BankAccount],
        input: NewAccount,
    ) -> Result<(BankAccount, Vec<BankAccount>), CoreError> {
        if input.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Account name must not be empty".into()));
        }
        let account = BankAccount {
            id: new_id(),
            name: input.name,
            bank_name: input.bank_name,
            balance: input.opening_balance,
            color: ACCOUNT_COLORS[accounts.len() % ACCOUNT_COLORS.len()].to_string(),
        };
        let mut updated = accounts.to_vec();
        updated.push(account.clone());
        Ok((account, updated))
    }

    /// Remove an account. Its transactions stay and show as an unknown account.
    pub fn close_account(
        &self,
        accounts: &[BankAccount],
        id: &str,
    ) -> Result<Vec<BankAccount>, CoreError> {
        if !accounts.iter().any(|a| a.id == id) {
            return Err(CoreError::AccountNotFound(id.to_string()));
        }
        Ok(accounts.iter().filter(|a| a.id != id).cloned().collect())
    }

    /// Append a new savings goal with nothing saved yet.
    pub fn create_dream(
        &self,
        dreams: &[DreamAccount],
        input: NewDream,
    ) -> Result<(DreamAccount, Vec<DreamAccount>), CoreError> {
        if input.target_amount <= Decimal::ZERO {
            return Err(CoreError::ValidationError(
                "Savings goal target must be positive".into(),
            ));
        }
        let icon = if input.icon.trim().is_empty() {
            DEFAULT_DREAM_ICON.to_string()
        } else {
            input.icon
        };
        let dream = DreamAccount {
            id: new_id(),
            title: input.title,
            target_amount: input.target_amount,
            current_amount: Decimal::ZERO,
            icon,
            color: DREAM_COLORS[dreams.len() % DREAM_COLORS.len()].to_string(),
        };
        let mut updated = dreams.to_vec();
        updated.push(dream.clone());
        Ok((dream, updated))
    }

    /// Add `amount` to a goal's saved amount.
    ///
    /// Returns `Ok(None)` (nothing to write) for a zero or negative amount,
    /// whether or not the goal exists.
    pub fn deposit(
        &self,
        dreams: &[DreamAccount],
        id: &str,
        amount: Decimal,
    ) -> Result<Option<Vec<DreamAccount>>, CoreError> {
        if amount <= Decimal::ZERO {
            return Ok(None);
        }
        if !dreams.iter().any(|d| d.id == id) {
            return Err(CoreError::DreamNotFound(id.to_string()));
        }
        let updated = dreams
            .iter()
            .map(|d| {
                if d.id == id {
                    DreamAccount {
                        current_amount: d.current_amount + amount,
                        ..d.clone()
                    }
                } else {
                    d.clone()
                }
            })
            .collect();
        Ok(Some(updated))
    }

    /// Remove a savings goal.
    pub fn abandon_dream(
        &self,
        dreams: &[DreamAccount],
        id: &str,
    ) -> Result<Vec<DreamAccount>, CoreError> {
        if !dreams.iter().any(|d| d.id == id) {
            return Err(CoreError::DreamNotFound(id.to_string()));
        }
        Ok(dreams.iter().filter(|d| d.id != id).cloned().collect())
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
