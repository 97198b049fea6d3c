//! Geocoding and nearby-store endpoints.

use lastbite_core::{GeoPoint, StoreListing};

use crate::client::DashboardClient;
use crate::error::ClientError;
use crate::types::{GeocodeEnvelope, GeocodeResult, NearbyEnvelope, NearbyStores};

impl DashboardClient {
    /// Resolves a ZIP code to coordinates.
    ///
    /// Sends `zip_code=<zip>` form-encoded with the CSRF header. Any non-2xx
    /// status is a transport failure whatever its body says; only a 2xx
    /// `"success": false` answer carries a message meant for the user.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingEndpoint`] if no geocode endpoint is configured.
    /// - [`ClientError::Rejected`] if a 2xx answer could not resolve the ZIP.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on
    ///   network failure or non-2xx status.
    /// - [`ClientError::Deserialize`] if a 2xx body has the wrong shape.
    /// - [`ClientError::InvalidCoordinates`] if the resolved point is off the globe.
    pub async fn geocode_zip(&self, zip_code: &str) -> Result<GeocodeResult, ClientError> {
        let path = self
            .endpoints
            .geocode
            .as_deref()
            .ok_or(ClientError::MissingEndpoint("Geocode"))?;
        let url = self.endpoint_url(path)?;
        tracing::debug!(%url, zip_code, "geocoding ZIP code");

        let request = self
            .client
            .post(url)
            .form(&[("zip_code", zip_code)]);
        let response = self.csrf_protected(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!(zip_code, status = status.as_u16(), "geocode request failed");
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: path.to_owned(),
            });
        }
        let envelope: GeocodeEnvelope = Self::decode(response, "geocode").await?;

        if !envelope.success {
            tracing::warn!(zip_code, error = ?envelope.error, "ZIP code rejected");
            return Err(ClientError::Rejected {
                message: envelope.error,
            });
        }

        let (Some(latitude), Some(longitude)) = (envelope.latitude, envelope.longitude) else {
            return Err(ClientError::Rejected {
                message: envelope.error,
            });
        };
        let point = GeoPoint::new(latitude, longitude)?;
        if let Some(name) = &envelope.display_name {
            tracing::debug!(zip_code, display_name = %name, "ZIP code resolved");
        }
        Ok(GeocodeResult {
            point,
            display_name: envelope.display_name,
        })
    }

    /// Lists stores within `radius_km` kilometers of `center`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingEndpoint`] if no nearby-stores endpoint is configured.
    /// - [`ClientError::Http`] on network failure or non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not the expected shape.
    /// - [`ClientError::Rejected`] if the backend reports `"success": false`.
    ///
    /// Listings whose coordinates are off the globe are dropped.
    pub async fn nearby_stores(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<NearbyStores, ClientError> {
        let path = self
            .endpoints
            .nearby_stores
            .as_deref()
            .ok_or(ClientError::MissingEndpoint("Nearby businesses"))?;
        let mut url = self.endpoint_url(path)?;
        url.query_pairs_mut()
            .append_pair("lat", &center.latitude.to_string())
            .append_pair("lng", &center.longitude.to_string())
            .append_pair("radius", &radius_km.to_string());
        tracing::debug!(%url, radius_km, "loading nearby stores");

        let response = self.session(self.client.get(url)).send().await?;
        let response = response.error_for_status()?;
        let envelope: NearbyEnvelope = Self::decode(response, "nearby stores").await?;
        if !envelope.success {
            return Err(ClientError::Rejected {
                message: envelope.error,
            });
        }

        let total = envelope.businesses.len();
        let listings: Vec<StoreListing> = envelope
            .businesses
            .into_iter()
            .filter(|listing| match listing.location.validated() {
                Ok(_) => true,
                Err(err) => {
                    tracing::warn!(
                        business_id = %listing.business_id,
                        error = %err,
                        "skipping store with invalid location"
                    );
                    false
                }
            })
            .collect();
        tracing::debug!(
            listings = listings.len(),
            skipped = total - listings.len(),
            "nearby stores loaded"
        );
        Ok(NearbyStores { listings })
    }
}
