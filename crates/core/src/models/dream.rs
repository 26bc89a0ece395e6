use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Color tags handed out to new savings goals, cycling by goal count.
pub const DREAM_COLORS: [&str; 5] = [
    "bg-rose-500",
    "bg-emerald-500",
    "bg-indigo-500",
    "bg-amber-500",
    "bg-purple-500",
];

/// Icon used when a goal is created without one.
pub const DEFAULT_DREAM_ICON: &str = "⭐";

/// A savings goal ("dream account").
///
/// `current_amount` only grows, through deposits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamAccount {
    pub id: String,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    /// Emoji glyph shown next to the goal
    pub icon: String,
    pub color: String,
}

impl DreamAccount {
    /// Saved share of the target in percent, capped at 100.
    /// A zero target reports 0.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let pct = self.current_amount / self.target_amount * Decimal::ONE_HUNDRED;
        pct.min(Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Amount still missing to reach the target (never negative).
    pub fn remaining(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }
}

/// Input for creating a savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDream {
    pub title: String,
    pub target_amount: Decimal,
    pub icon: String,
}

impl NewDream {
    pub fn new(title: impl Into<String>, target_amount: Decimal) -> Self {
        Self {
            title: title.into(),
            target_amount,
            icon: DEFAULT_DREAM_ICON.to_string(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}
