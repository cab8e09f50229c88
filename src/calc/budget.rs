//! # Budget Calculation
//!
//! Sum of cost items plus a contingency reserve. Items that are not
//! positive, not finite, or at least [`ITEM_CAP`] are treated as typos and
//! left out of the subtotal.

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) for a single cost item.
pub const ITEM_CAP: f64 = 1e9;

/// ## JSON Example
///
/// ```json
/// { "items": [100000, 200000, 50000], "reserve_percent": 20 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BudgetInput {
    pub items: Vec<f64>,
    #[serde(default)]
    pub reserve_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BudgetResult {
    pub subtotal: f64,
    pub reserve_amount: f64,
    pub total: f64,
    /// Number of items left out of the subtotal
    pub rejected_items: usize,
}

fn accepted(item: f64) -> bool {
    item.is_finite() && item > 0.0 && item < ITEM_CAP
}

pub fn compute_budget(input: &BudgetInput) -> BudgetResult {
    let subtotal: f64 = input.items.iter().copied().filter(|item| accepted(*item)).sum();
    let rejected_items = input.items.iter().filter(|item| !accepted(**item)).count();

    let reserve_percent = super::non_negative(input.reserve_percent);
    let reserve_amount = subtotal * reserve_percent / 100.0;

    BudgetResult {
        subtotal,
        reserve_amount,
        total: subtotal + reserve_amount,
        rejected_items,
    }
}
