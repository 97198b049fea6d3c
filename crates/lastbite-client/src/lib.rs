//! Async client for the dashboard and market JSON endpoints.

pub mod checkout;
pub mod client;
pub mod cookie;
pub mod error;
pub mod locator;
pub mod types;

pub use client::DashboardClient;
pub use cookie::read_cookie;
pub use error::ClientError;
pub use types::{GeocodeResult, NearbyStores};
