mod commands;
mod terminal;

use clap::{Parser, Subcommand};
use lastbite_core::RadiusMiles;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lastbite-cli")]
#[command(about = "Drive the LastBite dashboard flows against a live backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Refresh the dashboard stats panel once.
    Stats,
    /// Find stores around a ZIP code or a fixed position.
    Stores {
        /// ZIP code to search around.
        #[arg(long, conflicts_with_all = ["lat", "lng"], required_unless_present = "lat")]
        zip: Option<String>,
        /// Latitude used as the device position.
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude used as the device position.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Search radius in miles (defaults to `LASTBITE_DEFAULT_RADIUS_MILES`).
        #[arg(long)]
        radius: Option<RadiusMiles>,
    },
    /// Open a checkout session for the current cart.
    Checkout,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("lastbite-cli: pass a subcommand (stats, stores, checkout); see --help");
        return Ok(());
    };

    let config = lastbite_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    match command {
        Commands::Stats => commands::run_stats(&config).await,
        Commands::Stores {
            zip,
            lat,
            lng,
            radius,
        } => {
            let origin = match (zip, lat, lng) {
                (Some(zip), _, _) => commands::Origin::Zip(zip),
                (None, Some(lat), Some(lng)) => {
                    commands::Origin::Position(lastbite_core::GeoPoint::new(lat, lng)?)
                }
                _ => anyhow::bail!("either --zip or both --lat and --lng are required"),
            };
            commands::run_stores(&config, origin, radius.unwrap_or(config.default_radius)).await
        }
        Commands::Checkout => commands::run_checkout(&config).await,
    }
}
