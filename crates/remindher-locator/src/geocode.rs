//! Postal code → coordinate resolution against a Nominatim-compatible API.

use std::time::Duration;

use remindher_core::Coordinate;
use reqwest::{Client, Url};
use serde::de::Error as _;
use tokio_util::sync::CancellationToken;

use crate::error::LocatorError;
use crate::fetch::run_with_deadline;
use crate::types::GeocodeHit;

/// Resolves postal codes to a single best-match [`Coordinate`].
#[derive(Debug, Clone)]
pub struct CoordinateResolver {
    client: Client,
    search_url: Url,
    country: String,
    timeout: Duration,
}

impl CoordinateResolver {
    /// Creates a resolver rooted at `base_url` (e.g.
    /// `https://nominatim.openstreetmap.org`).
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(
        client: Client,
        base_url: &str,
        country: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LocatorError> {
        let raw = format!("{}/search", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&raw).map_err(|e| LocatorError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            search_url,
            country: country.into(),
            timeout,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the lookup URL for `postal_code`.
    #[must_use]
    pub fn search_url(&self, postal_code: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("postalcode", postal_code)
            .append_pair("country", &self.country)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }

    /// Looks up `postal_code` and returns the first match.
    ///
    /// A blank postal code short-circuits to `MissingPostalCode` without a
    /// request.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::MissingPostalCode`] for blank input.
    /// - [`LocatorError::NotFound`] when the geocoder returns no matches.
    /// - [`LocatorError::UnexpectedStatus`] / [`LocatorError::Http`] on
    ///   transport failure.
    /// - [`LocatorError::Timeout`] when the request exceeds its deadline.
    /// - [`LocatorError::Deserialize`] when the body or its coordinates do not
    ///   parse.
    /// - [`LocatorError::Cancelled`] if `cancel` fires first.
    pub async fn resolve(
        &self,
        postal_code: &str,
        cancel: &CancellationToken,
    ) -> Result<Coordinate, LocatorError> {
        let postal_code = postal_code.trim();
        if postal_code.is_empty() {
            return Err(LocatorError::MissingPostalCode);
        }

        let url = self.search_url(postal_code);
        tracing::debug!(postal_code, "geocoding postal code");

        let request = async {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LocatorError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: self.search_url.to_string(),
                });
            }
            let body = response.text().await?;
            serde_json::from_str::<Vec<GeocodeHit>>(&body).map_err(|e| {
                LocatorError::Deserialize {
                    context: format!("geocoder response for {postal_code}"),
                    source: e,
                }
            })
        };

        let hits = run_with_deadline(self.search_url.as_str(), self.timeout, cancel, request).await?;

        let Some(hit) = hits.into_iter().next() else {
            return Err(LocatorError::NotFound {
                postal_code: postal_code.to_owned(),
            });
        };

        let coordinate = Coordinate {
            latitude: parse_degrees(&hit.lat, "lat", postal_code)?,
            longitude: parse_degrees(&hit.lon, "lon", postal_code)?,
            display_name: hit.display_name,
        };
        tracing::debug!(
            postal_code,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "postal code resolved"
        );
        Ok(coordinate)
    }
}

fn parse_degrees(raw: &str, field: &str, postal_code: &str) -> Result<f64, LocatorError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LocatorError::Deserialize {
            context: format!("geocoder {field} for {postal_code}"),
            source: serde_json::Error::custom(format!("not a number: {raw:?}")),
        })
}
