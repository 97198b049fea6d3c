use crate::app_config::{AppConfig, Endpoints, Environment};
use crate::units::RadiusMiles;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Unset falls back to the default; set-but-empty disables the endpoint.
    let optional_path = |var: &str, default: &str| -> Option<String> {
        let raw = or_default(var, default);
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = require("LASTBITE_BASE_URL")?;
    let env = parse_environment(&or_default("LASTBITE_ENV", "development"));
    let log_level = or_default("LASTBITE_LOG_LEVEL", "info");

    let defaults = Endpoints::default();
    let endpoints = Endpoints {
        stats: or_default("LASTBITE_STATS_PATH", &defaults.stats),
        geocode: optional_path(
            "LASTBITE_GEOCODE_PATH",
            defaults.geocode.as_deref().unwrap_or_default(),
        ),
        nearby_stores: optional_path(
            "LASTBITE_NEARBY_PATH",
            defaults.nearby_stores.as_deref().unwrap_or_default(),
        ),
        payment_config: or_default("LASTBITE_PAYMENT_CONFIG_PATH", &defaults.payment_config),
        checkout_session: or_default(
            "LASTBITE_CHECKOUT_SESSION_PATH",
            &defaults.checkout_session,
        ),
    };

    let store_page_prefix = or_default("LASTBITE_STORE_PAGE_PREFIX", "/biz/public/");
    let cookie = lookup("LASTBITE_COOKIE").ok().filter(|c| !c.is_empty());
    let csrf_cookie_name = or_default("LASTBITE_CSRF_COOKIE", "csrftoken");
    let request_timeout_secs = parse_u64("LASTBITE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LASTBITE_USER_AGENT", "lastbite/0.1 (dashboard-client)");

    let default_radius = or_default("LASTBITE_DEFAULT_RADIUS_MILES", "10")
        .parse::<RadiusMiles>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "LASTBITE_DEFAULT_RADIUS_MILES".to_string(),
            reason: e.to_string(),
        })?;

    Ok(AppConfig {
        base_url,
        env,
        log_level,
        endpoints,
        store_page_prefix,
        cookie,
        csrf_cookie_name,
        request_timeout_secs,
        user_agent,
        default_radius,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
