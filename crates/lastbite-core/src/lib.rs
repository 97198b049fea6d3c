pub mod app_config;
pub mod checkout;
pub mod config;
pub mod geo;
pub mod stats;
pub mod stores;
pub mod units;

pub use app_config::{AppConfig, Endpoints, Environment};
pub use checkout::{CheckoutSession, PublishableKey};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{Bounds, GeoPoint};
pub use stats::{format_currency, StatsSnapshot};
pub use stores::{BusinessId, FeaturedProduct, StoreListing};
pub use units::{display_miles, km_to_miles, miles_to_km, RadiusMiles, KM_PER_MILE};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("invalid search radius: {0}")]
    InvalidRadius(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
