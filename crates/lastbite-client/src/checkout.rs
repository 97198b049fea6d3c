//! Payment-provider configuration and checkout sessions.

use lastbite_core::{CheckoutSession, PublishableKey};

use crate::client::DashboardClient;
use crate::error::ClientError;
use crate::types::{CheckoutSessionEnvelope, PaymentConfigEnvelope};

impl DashboardClient {
    /// Fetches the payment provider's publishable key.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not the expected shape.
    /// - [`ClientError::Rejected`] if the body carries no key.
    pub async fn fetch_payment_config(&self) -> Result<PublishableKey, ClientError> {
        let url = self.endpoint_url(&self.endpoints.payment_config)?;
        tracing::debug!(%url, "fetching payment config");
        let response = self.session(self.client.get(url)).send().await?;
        let response = response.error_for_status()?;
        let envelope: PaymentConfigEnvelope = Self::decode(response, "payment config").await?;
        envelope
            .publishable_key
            .filter(|k| !k.is_empty())
            .map(PublishableKey::new)
            .ok_or(ClientError::Rejected { message: None })
    }

    /// Asks the backend to open a checkout session for the current cart.
    ///
    /// The backend reports refusals (empty cart, provider failure) as a 400
    /// with `{ "error": ... }`; that message is passed through.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Rejected`] if the backend returns an `error` or no
    ///   session id.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on
    ///   transport failure.
    /// - [`ClientError::Deserialize`] if a 2xx body has the wrong shape.
    pub async fn create_checkout_session(&self) -> Result<CheckoutSession, ClientError> {
        let url = self.endpoint_url(&self.endpoints.checkout_session)?;
        tracing::debug!(%url, "creating checkout session");
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        let response = self.csrf_protected(request).send().await?;
        let (status, envelope): (_, CheckoutSessionEnvelope) =
            Self::decode_any_status(response, "checkout session").await?;

        if let Some(error) = envelope.error {
            tracing::warn!(status = status.as_u16(), %error, "checkout session refused");
            return Err(ClientError::Rejected {
                message: Some(error),
            });
        }
        match envelope.session_id.filter(|id| !id.is_empty()) {
            Some(session_id) if status.is_success() => Ok(CheckoutSession { session_id }),
            Some(_) => Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoints.checkout_session.clone(),
            }),
            None => Err(ClientError::Rejected { message: None }),
        }
    }
}
