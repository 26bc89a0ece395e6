use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::Category;

/// Monthly spending limit for one category.
/// A budget list holds at most one entry per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Category,
    pub limit: Decimal,
}

impl Budget {
    pub fn new(category: Category, limit: Decimal) -> Self {
        Self { category, limit }
    }
}
