use crate::units::RadiusMiles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Backend endpoint paths, relative to [`AppConfig::base_url`].
///
/// The geocode and nearby-stores paths are optional: a page that never
/// rendered them leaves the locator unable to search, which surfaces as a
/// configuration error rather than a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub stats: String,
    pub geocode: Option<String>,
    pub nearby_stores: Option<String>,
    pub payment_config: String,
    pub checkout_session: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            stats: "/dashboard/api/stats/".to_owned(),
            geocode: Some("/dashboard/api/geocode-zipcode/".to_owned()),
            nearby_stores: Some("/dashboard/api/nearby-businesses/".to_owned()),
            payment_config: "/market/config/".to_owned(),
            checkout_session: "/market/create-checkout-session/".to_owned(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub env: Environment,
    pub log_level: String,
    pub endpoints: Endpoints,
    pub store_page_prefix: String,
    pub cookie: Option<String>,
    pub csrf_cookie_name: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub default_radius: RadiusMiles,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("endpoints", &self.endpoints)
            .field("store_page_prefix", &self.store_page_prefix)
            .field("cookie", &self.cookie.as_ref().map(|_| "[redacted]"))
            .field("csrf_cookie_name", &self.csrf_cookie_name)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("default_radius", &self.default_radius)
            .finish()
    }
}
