use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Cart and order statistics shown on the merchant dashboard.
///
/// Every field is optional: a field the backend leaves out must leave its
/// display slot untouched, so "absent" has to survive deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(rename = "total_cart_items", default)]
    pub cart_item_count: Option<u64>,
    #[serde(default)]
    pub cart_subtotal: Option<Decimal>,
    #[serde(default)]
    pub favorites_count: Option<u64>,
    #[serde(default)]
    pub total_spent: Option<Decimal>,
}

/// Formats a currency amount as `$` followed by exactly two decimals.
///
/// Halves round away from zero.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}
