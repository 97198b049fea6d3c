//! Checkout button that hands the cart to a hosted payment page.
//!
//! The payment provider is configured once from the backend's publishable
//! key. Without it the button stays inert. A click opens a checkout
//! session and passes its id to the provider, which performs the redirect.

use std::cell::Cell;
use std::future::Future;

use lastbite_client::{ClientError, DashboardClient};
use lastbite_core::{CheckoutSession, PublishableKey};
use thiserror::Error;

pub const PROCESSING_LABEL: &str = "Processing...";

const MSG_GENERIC_FAILURE: &str = "An error occurred. Please try again.";

pub trait CheckoutButton {
    fn set_disabled(&self, disabled: bool);

    fn set_label(&self, label: &str);
}

/// Blocking user-facing alerts.
pub trait Alerts {
    fn alert(&self, message: &str);
}

/// The hosted payment provider's client-side redirect.
pub trait PaymentProvider {
    fn redirect_to_checkout(
        &self,
        session: &CheckoutSession,
    ) -> impl Future<Output = Result<(), ProviderError>>;
}

/// The provider refused to redirect. The message is meant for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No payment config was loaded; clicks do nothing.
    #[error("checkout is not available")]
    Inert,

    /// A previous click is still being processed.
    #[error("checkout already in progress")]
    InFlight,

    #[error("checkout session refused: {0}")]
    Rejected(#[source] ClientError),

    #[error("checkout session request failed: {0}")]
    Transport(#[source] ClientError),

    #[error("payment provider refused redirect: {0}")]
    Provider(#[from] ProviderError),
}

impl CheckoutError {
    /// Text of the blocking alert for this failure.
    #[must_use]
    pub fn alert_message(&self) -> &str {
        match self {
            Self::Rejected(err) => err.rejection_message().unwrap_or(MSG_GENERIC_FAILURE),
            Self::Provider(err) if !err.message().is_empty() => err.message(),
            _ => MSG_GENERIC_FAILURE,
        }
    }
}

impl From<ClientError> for CheckoutError {
    fn from(err: ClientError) -> Self {
        if matches!(err, ClientError::Rejected { .. }) {
            Self::Rejected(err)
        } else {
            Self::Transport(err)
        }
    }
}

pub struct CheckoutRedirect<B, A, P> {
    client: DashboardClient,
    button: B,
    alerts: A,
    provider: Option<P>,
    label: String,
    in_flight: Cell<bool>,
}

impl<B, A, P> CheckoutRedirect<B, A, P>
where
    B: CheckoutButton,
    A: Alerts,
    P: PaymentProvider,
{
    /// Loads the payment config and builds the provider from its key. If
    /// the config cannot be loaded the failure is logged and the returned
    /// redirect is inert.
    ///
    /// `label` is the button's resting label, restored after a failure.
    pub async fn initialize<F>(
        client: DashboardClient,
        button: B,
        alerts: A,
        label: impl Into<String>,
        make_provider: F,
    ) -> Self
    where
        F: FnOnce(PublishableKey) -> P,
    {
        let provider = match client.fetch_payment_config().await {
            Ok(key) => {
                tracing::debug!(?key, "payment provider configured");
                Some(make_provider(key))
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching payment config");
                None
            }
        };
        Self {
            client,
            button,
            alerts,
            provider,
            label: label.into(),
            in_flight: Cell::new(false),
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.provider.is_some()
    }

    #[must_use]
    pub fn button(&self) -> &B {
        &self.button
    }

    #[must_use]
    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    #[must_use]
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Click handler of the checkout button.
    ///
    /// The button is disabled with a processing label until the outcome is
    /// known. On success it stays disabled while the provider navigates
    /// away. On failure it is re-enabled with its label restored and the
    /// user is alerted. Dropping the returned future before it completes
    /// also restores the button and accepts the next click.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Inert`] / [`CheckoutError::InFlight`]: the click
    ///   was ignored.
    /// - [`CheckoutError::Rejected`], [`CheckoutError::Transport`] or
    ///   [`CheckoutError::Provider`] after the failure has been alerted.
    pub async fn on_click(&self) -> Result<CheckoutSession, CheckoutError> {
        let Some(provider) = &self.provider else {
            tracing::debug!("checkout click ignored, payment provider not configured");
            return Err(CheckoutError::Inert);
        };
        if self.in_flight.replace(true) {
            tracing::debug!("checkout click ignored, already in progress");
            return Err(CheckoutError::InFlight);
        }

        let mut guard = ClickGuard {
            in_flight: &self.in_flight,
            button: &self.button,
            label: &self.label,
            settled: false,
        };
        self.button.set_disabled(true);
        self.button.set_label(PROCESSING_LABEL);

        let result = self.start_checkout(provider).await;

        match &result {
            Ok(_) => guard.settled = true,
            Err(err) => {
                match err {
                    CheckoutError::Transport(_) => tracing::error!(error = %err, "checkout failed"),
                    _ => tracing::warn!(error = %err, "checkout failed"),
                }
                drop(guard);
                self.alerts.alert(err.alert_message());
            }
        }
        result
    }

    async fn start_checkout(&self, provider: &P) -> Result<CheckoutSession, CheckoutError> {
        let session = self.client.create_checkout_session().await?;
        tracing::debug!(session_id = %session.session_id, "redirecting to checkout");
        provider.redirect_to_checkout(&session).await?;
        Ok(session)
    }
}

/// Clears the in-flight flag when a click ends, however it ends. Unless the
/// click settled successfully the button is re-enabled with its resting
/// label.
struct ClickGuard<'a, B: CheckoutButton> {
    in_flight: &'a Cell<bool>,
    button: &'a B,
    label: &'a str,
    settled: bool,
}

impl<B: CheckoutButton> Drop for ClickGuard<'_, B> {
    fn drop(&mut self) {
        self.in_flight.set(false);
        if !self.settled {
            self.button.set_disabled(false);
            self.button.set_label(self.label);
        }
    }
}
