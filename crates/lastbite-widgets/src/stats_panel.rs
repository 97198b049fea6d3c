//! Cart and order statistics written into fixed page slots.

use lastbite_client::{ClientError, DashboardClient};
use lastbite_core::{format_currency, StatsSnapshot};

/// One display slot of the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatSlot {
    CartItems,
    CartSubtotal,
    Favorites,
    TotalSpent,
}

impl StatSlot {
    pub const ALL: [StatSlot; 4] = [
        StatSlot::CartItems,
        StatSlot::CartSubtotal,
        StatSlot::Favorites,
        StatSlot::TotalSpent,
    ];

    /// Element id the slot is bound to on the dashboard page.
    #[must_use]
    pub fn binding_id(self) -> &'static str {
        match self {
            StatSlot::CartItems => "stat-cart-items",
            StatSlot::CartSubtotal => "stat-cart-subtotal",
            StatSlot::Favorites => "stat-favorites",
            StatSlot::TotalSpent => "stat-total-spent",
        }
    }
}

pub trait StatSlots {
    fn set_text(&self, slot: StatSlot, text: &str);
}

/// Slot texts for the fields present in `stats`. Absent fields yield no
/// entry.
#[must_use]
pub fn slot_texts(stats: &StatsSnapshot) -> Vec<(StatSlot, String)> {
    let mut texts = Vec::with_capacity(StatSlot::ALL.len());
    if let Some(count) = stats.cart_item_count {
        texts.push((StatSlot::CartItems, count.to_string()));
    }
    if let Some(amount) = stats.cart_subtotal {
        texts.push((StatSlot::CartSubtotal, format_currency(amount)));
    }
    if let Some(count) = stats.favorites_count {
        texts.push((StatSlot::Favorites, count.to_string()));
    }
    if let Some(amount) = stats.total_spent {
        texts.push((StatSlot::TotalSpent, format_currency(amount)));
    }
    texts
}

pub struct StatsPanel<S> {
    client: DashboardClient,
    slots: S,
}

impl<S: StatSlots> StatsPanel<S> {
    pub fn new(client: DashboardClient, slots: S) -> Self {
        Self { client, slots }
    }

    #[must_use]
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// # Errors
    ///
    /// See [`StatsPanel::refresh`].
    pub async fn on_page_load(&self) -> Result<usize, ClientError> {
        self.refresh().await
    }

    /// Refreshes when the page became visible. A page going hidden sends
    /// nothing and returns `None`.
    pub async fn on_visibility_change(&self, visible: bool) -> Option<Result<usize, ClientError>> {
        if visible {
            Some(self.refresh().await)
        } else {
            None
        }
    }

    /// Fetches the stats once and writes every present field into its
    /// slot. Returns the number of slots written.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] of a failed fetch after logging it. The
    /// slots keep whatever they showed before.
    pub async fn refresh(&self) -> Result<usize, ClientError> {
        let stats = match self.client.fetch_stats().await {
            Ok(stats) => stats,
            Err(err) => {
                tracing::error!(error = %err, "error fetching dashboard stats");
                return Err(err);
            }
        };

        let texts = slot_texts(&stats);
        for (slot, text) in &texts {
            tracing::debug!(slot = slot.binding_id(), text, "updating stat");
            self.slots.set_text(*slot, text);
        }
        Ok(texts.len())
    }
}
