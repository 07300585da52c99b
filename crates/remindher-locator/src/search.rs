//! End-to-end postal code → facility search.

use std::time::Duration;

use remindher_core::{AppConfig, Coordinate, Facility};
use reqwest::Client;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{ErrorKind, LocatorError};
use crate::failover::EndpointFailover;
use crate::fetch::FetchClient;
use crate::geocode::CoordinateResolver;
use crate::normalize::{normalize_elements, parse_elements};
use crate::query::QueryBuilder;
use crate::retry::RetryPolicy;

pub const BUSY_MESSAGE: &str =
    "Server is busy right now. Please try again in a few minutes or try a different pincode.";
pub const UNAVAILABLE_MESSAGE: &str =
    "Healthcare database is temporarily unavailable. Please try again later.";
pub const CANCELLED_MESSAGE: &str = "Search was cancelled.";

/// Connection settings for the whole pipeline.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub geocoder_url: String,
    pub geocoder_country: String,
    pub user_agent: String,
    pub overpass_endpoints: Vec<String>,
    pub search_radius_meters: u32,
    pub retry: RetryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl SearchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            geocoder_url: config.geocoder_url.clone(),
            geocoder_country: config.geocoder_country.clone(),
            user_agent: config.user_agent.clone(),
            overpass_endpoints: config.overpass_endpoints.clone(),
            search_radius_meters: config.search_radius_meters,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                backoff_base: Duration::from_secs(config.retry_backoff_base_secs),
                attempt_timeout: Duration::from_secs(config.request_timeout_secs),
            },
        }
    }
}

/// Result of one search. Serializes with a `status` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Success {
        coordinate: Coordinate,
        count: usize,
        facilities: Vec<Facility>,
    },
    Failure {
        reason: ErrorKind,
        message: String,
    },
}

impl SearchOutcome {
    #[must_use]
    pub fn success(coordinate: Coordinate, facilities: Vec<Facility>) -> Self {
        Self::Success {
            coordinate,
            count: facilities.len(),
            facilities,
        }
    }

    #[must_use]
    pub fn from_error(err: &LocatorError) -> Self {
        Self::Failure {
            reason: err.kind(),
            message: user_message(err),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Maps a pipeline error to the text shown to the person searching.
#[must_use]
pub fn user_message(err: &LocatorError) -> String {
    if err.is_busy() {
        BUSY_MESSAGE.to_owned()
    } else if matches!(err, LocatorError::AllEndpointsFailed { .. }) {
        UNAVAILABLE_MESSAGE.to_owned()
    } else if matches!(err, LocatorError::Cancelled) {
        CANCELLED_MESSAGE.to_owned()
    } else {
        format!("Search failed: {err}")
    }
}

/// Geocodes a postal code, queries the facility service with failover, and
/// normalizes the results.
///
/// Cloning is cheap; the underlying HTTP client pools connections.
#[derive(Debug, Clone)]
pub struct FacilitySearch {
    resolver: CoordinateResolver,
    queries: QueryBuilder,
    failover: EndpointFailover,
}

impl FacilitySearch {
    /// Builds the pipeline with one shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Http`] if the client cannot be built, or
    /// [`LocatorError::InvalidUrl`] for an unparseable service URL.
    pub fn new(config: &SearchConfig) -> Result<Self, LocatorError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.retry.attempt_timeout)
            .build()?;

        let resolver = CoordinateResolver::new(
            client.clone(),
            &config.geocoder_url,
            config.geocoder_country.clone(),
            config.retry.attempt_timeout,
        )?;
        let failover = EndpointFailover::from_urls(
            &config.overpass_endpoints,
            FetchClient::new(client, config.retry),
        )?;

        Ok(Self::from_parts(
            resolver,
            QueryBuilder::new(config.search_radius_meters)
                .with_server_timeout_secs(config.retry.attempt_timeout.as_secs()),
            failover,
        ))
    }

    #[must_use]
    pub fn from_parts(
        resolver: CoordinateResolver,
        queries: QueryBuilder,
        failover: EndpointFailover,
    ) -> Self {
        Self {
            resolver,
            queries,
            failover,
        }
    }

    /// Upper bound on one search: geocoder deadline plus every endpoint's
    /// full retry budget.
    #[must_use]
    pub fn worst_case_latency(&self) -> Duration {
        self.resolver
            .timeout()
            .saturating_add(self.failover.worst_case_latency())
    }

    pub async fn search_by_postal_code(&self, postal_code: &str) -> SearchOutcome {
        self.search_by_postal_code_with_cancel(postal_code, &CancellationToken::new())
            .await
    }

    /// Like [`Self::search_by_postal_code`], but aborts in-flight requests
    /// and back-off sleeps when `cancel` fires.
    pub async fn search_by_postal_code_with_cancel(
        &self,
        postal_code: &str,
        cancel: &CancellationToken,
    ) -> SearchOutcome {
        match self.run(postal_code, cancel).await {
            Ok((coordinate, facilities)) => {
                tracing::info!(
                    postal_code,
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    facilities = facilities.len(),
                    "facility search complete"
                );
                SearchOutcome::success(coordinate, facilities)
            }
            Err(err) => {
                tracing::info!(
                    postal_code,
                    kind = %err.kind(),
                    error = %err,
                    "facility search failed"
                );
                SearchOutcome::from_error(&err)
            }
        }
    }

    async fn run(
        &self,
        postal_code: &str,
        cancel: &CancellationToken,
    ) -> Result<(Coordinate, Vec<Facility>), LocatorError> {
        let coordinate = self.resolver.resolve(postal_code, cancel).await?;
        let query = self.queries.build(&coordinate).to_string();
        let response = self
            .failover
            .search_across_endpoints(&query, cancel)
            .await?;

        let raw = parse_elements(response.elements);
        let facilities = normalize_elements(&raw);
        tracing::debug!(
            raw = raw.len(),
            kept = facilities.len(),
            "normalized facility records"
        );
        Ok((coordinate, facilities))
    }
}
