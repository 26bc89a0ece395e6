use crate::models::budget::Budget;
use crate::models::transaction::{Transaction, TransactionType};
use crate::providers::traits::AdviceProvider;

/// Shown when the advice backend is missing or fails.
pub const ADVICE_UNAVAILABLE: &str =
    "Sorry, the AI advisor is busy right now. Please try again later.";

/// Shown when the advice backend answers with nothing.
pub const ADVICE_EMPTY: &str = "No advice is available at the moment.";

/// Number of ledger entries summarized in the prompt.
const PROMPT_TRANSACTIONS: usize = 20;

/// Produces personal-finance advice from the ledger and budgets.
///
/// Never fails: every problem ends up as one of the fallback texts.
pub struct AdviceService {
    provider: Option<Box<dyn AdviceProvider>>,
}

impl AdviceService {
    pub fn new(provider: Option<Box<dyn AdviceProvider>>) -> Self {
        Self { provider }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn advise(&self, transactions: &[Transaction], budgets: &[Budget]) -> String {
        let Some(provider) = &self.provider else {
            log::debug!("no advice provider configured");
            return ADVICE_UNAVAILABLE.to_string();
        };

        let prompt = Self::build_prompt(transactions, budgets);
        match provider.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => ADVICE_EMPTY.to_string(),
            Ok(text) => text,
            Err(e) => {
                log::error!("advice request to {} failed: {e}", provider.name());
                ADVICE_UNAVAILABLE.to_string()
            }
        }
    }

    /// Prompt text: the last 20 ledger entries (in list order) and every budget.
    pub fn build_prompt(transactions: &[Transaction], budgets: &[Budget]) -> String {
        let start = transactions.len().saturating_sub(PROMPT_TRANSACTIONS);
        let summary = transactions[start..]
            .iter()
            .map(|t| {
                let sign = match t.transaction_type {
                    TransactionType::Income => '+',
                    TransactionType::Expense => '-',
                };
                format!("{}: {} {sign}{} ({})", t.date, t.category, t.amount, t.description)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let budget_info = budgets
            .iter()
            .map(|b| format!("{} budget: {}", b.category, b.limit))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "You are a professional personal finance advisor. \
             Here is a summary of the user's recent financial records:\n\
             {summary}\n\n\
             Budget settings:\n\
             {budget_info}\n\n\
             Based on this data, give 3 concrete suggestions that help the user \
             improve their finances. Keep the tone friendly and professional."
        )
    }
}

impl std::fmt::Debug for AdviceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdviceService")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .finish()
    }
}
