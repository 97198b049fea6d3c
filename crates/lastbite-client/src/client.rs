//! HTTP client for the dashboard backend.
//!
//! Wraps `reqwest` with endpoint resolution, CSRF header handling and typed
//! response decoding. Application-level refusals (`"success": false`, an
//! `"error"` field) surface as [`ClientError::Rejected`] so callers can tell
//! them apart from transport failures.

use std::time::Duration;

use lastbite_core::{AppConfig, Endpoints, StatsSnapshot};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

use crate::cookie::read_cookie;
use crate::error::ClientError;
use crate::types::StatsEnvelope;

pub(crate) const CSRF_HEADER: &str = "X-CSRFToken";

/// Client for the dashboard and market endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct DashboardClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) endpoints: Endpoints,
    cookie: Option<String>,
    csrf_cookie_name: String,
}

impl DashboardClient {
    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the base URL does not parse, or
    /// [`ClientError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let client = Self::new(
            &config.base_url,
            config.endpoints.clone(),
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        Ok(client.with_cookies(config.cookie.clone(), &config.csrf_cookie_name))
    }

    /// Creates a client without cookies. Tests point `base_url` at a
    /// wiremock server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ClientError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        endpoints: Endpoints,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            endpoints,
            cookie: None,
            csrf_cookie_name: "csrftoken".to_owned(),
        })
    }

    /// Attaches the browser-session cookie string. It is sent as the
    /// `Cookie` header and the CSRF token is read from it.
    #[must_use]
    pub fn with_cookies(mut self, cookie: Option<String>, csrf_cookie_name: &str) -> Self {
        self.cookie = cookie;
        csrf_cookie_name.clone_into(&mut self.csrf_cookie_name);
        self
    }

    /// Current CSRF token, if the cookie string carries one.
    #[must_use]
    pub fn csrf_token(&self) -> Option<String> {
        self.cookie
            .as_deref()
            .and_then(|jar| read_cookie(jar, &self.csrf_cookie_name))
    }

    /// Fetches the dashboard statistics.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not the expected shape.
    /// - [`ClientError::Rejected`] if the backend reports `"success": false`.
    pub async fn fetch_stats(&self) -> Result<StatsSnapshot, ClientError> {
        let url = self.endpoint_url(&self.endpoints.stats)?;
        tracing::debug!(%url, "fetching dashboard stats");
        let response = self.session(self.client.get(url.clone())).send().await?;
        let response = response.error_for_status()?;
        let envelope: StatsEnvelope = Self::decode(response, "stats").await?;
        if !envelope.success {
            return Err(ClientError::Rejected {
                message: envelope.error,
            });
        }
        Ok(envelope.stats.unwrap_or_default())
    }

    /// Resolves an endpoint path against the base URL.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl {
                url: path.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Adds the session cookie to a request.
    pub(crate) fn session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request,
        }
    }

    /// Adds the session cookie and the CSRF header to a state-changing
    /// request.
    pub(crate) fn csrf_protected(&self, request: RequestBuilder) -> RequestBuilder {
        let request = self.session(request);
        match self.csrf_token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => {
                tracing::warn!(
                    cookie = %self.csrf_cookie_name,
                    "no CSRF cookie present, sending request without token"
                );
                request
            }
        }
    }

    /// Reads the body and decodes it as `T`.
    pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ClientError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Reads the body of a response whose error statuses carry a JSON
    /// explanation. On a non-2xx status the body is decoded as `T` when it
    /// can be; otherwise the status itself becomes the error.
    pub(crate) async fn decode_any_status<T: serde::de::DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<(StatusCode, T), ClientError> {
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;
        match serde_json::from_str::<T>(&body) {
            Ok(value) => Ok((status, value)),
            Err(_) if !status.is_success() => Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            }),
            Err(e) => Err(ClientError::Deserialize {
                context: context.to_owned(),
                source: e,
            }),
        }
    }
}
