//! Subcommand handlers. Each one wires a dashboard flow to the terminal
//! surfaces and runs it once.

use lastbite_client::DashboardClient;
use lastbite_core::{AppConfig, GeoPoint, RadiusMiles};
use lastbite_widgets::{CheckoutRedirect, StatsPanel, StoreLocator};

use crate::terminal::{
    ConsoleRedirect, FixedPosition, TerminalAlerts, TerminalButton, TerminalMap, TerminalSlots,
    TerminalView,
};

const CHECKOUT_LABEL: &str = "Proceed to Checkout";

/// Where a store search starts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Origin {
    Zip(String),
    Position(GeoPoint),
}

fn build_client(config: &AppConfig) -> anyhow::Result<DashboardClient> {
    DashboardClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build dashboard client: {e}"))
}

/// # Errors
///
/// Returns an error if the client cannot be built or the stats request
/// fails.
pub(crate) async fn run_stats(config: &AppConfig) -> anyhow::Result<()> {
    let panel = StatsPanel::new(build_client(config)?, TerminalSlots);
    let written = panel.on_page_load().await?;
    if written == 0 {
        println!("backend returned no stats");
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the client cannot be built or the search ends
/// without rendering stores. The reason has already been printed.
pub(crate) async fn run_stores(
    config: &AppConfig,
    origin: Origin,
    radius: RadiusMiles,
) -> anyhow::Result<()> {
    let position = match &origin {
        Origin::Position(point) => Some(*point),
        Origin::Zip(_) => None,
    };
    let locator = StoreLocator::new(
        build_client(config)?,
        TerminalMap::default(),
        TerminalView,
        FixedPosition(position),
        config.store_page_prefix.clone(),
        radius,
    );

    let rendered = match origin {
        Origin::Zip(zip) => locator.search_zip(&zip).await?,
        Origin::Position(_) => locator.on_page_load().await?,
    };
    tracing::info!(rendered, %radius, "store search finished");
    Ok(())
}

/// # Errors
///
/// Returns an error if the client cannot be built, the payment config is
/// unavailable, or the checkout fails.
pub(crate) async fn run_checkout(config: &AppConfig) -> anyhow::Result<()> {
    let redirect = CheckoutRedirect::initialize(
        build_client(config)?,
        TerminalButton,
        TerminalAlerts,
        CHECKOUT_LABEL,
        ConsoleRedirect::new,
    )
    .await;
    if !redirect.is_armed() {
        anyhow::bail!("payment config unavailable; checkout is disabled");
    }

    let session = redirect.on_click().await?;
    println!("checkout session: {}", session.session_id);
    Ok(())
}
