//! Sequential failover across equivalent Overpass endpoints.

use std::time::Duration;

use reqwest::Url;
use tokio_util::sync::CancellationToken;

use crate::error::LocatorError;
use crate::fetch::FetchClient;
use crate::types::OverpassResponse;

/// Tries each endpoint in order until one returns a parseable response.
///
/// Order is fixed at construction; past failures never reorder endpoints.
#[derive(Debug, Clone)]
pub struct EndpointFailover {
    endpoints: Vec<Url>,
    fetcher: FetchClient,
}

impl EndpointFailover {
    #[must_use]
    pub fn new(endpoints: Vec<Url>, fetcher: FetchClient) -> Self {
        Self { endpoints, fetcher }
    }

    /// Parses each string as a URL and builds the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidUrl`] for the first endpoint that does
    /// not parse.
    pub fn from_urls<S: AsRef<str>>(
        endpoints: &[S],
        fetcher: FetchClient,
    ) -> Result<Self, LocatorError> {
        let endpoints = endpoints
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                Url::parse(raw).map_err(|e| LocatorError::InvalidUrl {
                    url: raw.to_owned(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(endpoints, fetcher))
    }

    #[must_use]
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Upper bound on time spent before [`LocatorError::AllEndpointsFailed`].
    #[must_use]
    pub fn worst_case_latency(&self) -> Duration {
        let count = u32::try_from(self.endpoints.len()).unwrap_or(u32::MAX);
        self.fetcher.policy().worst_case_per_endpoint().saturating_mul(count)
    }

    /// Runs `query` against each endpoint in turn and returns the first
    /// successful, parseable response.
    ///
    /// A response body that is not valid Overpass JSON counts as that
    /// endpoint's failure and moves on to the next endpoint.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::AllEndpointsFailed`] carrying the last endpoint's
    ///   error when none succeeds (or `None` when no endpoints are configured).
    /// - [`LocatorError::Cancelled`] as soon as `cancel` fires.
    pub async fn search_across_endpoints(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<OverpassResponse, LocatorError> {
        let mut last_error: Option<LocatorError> = None;

        for endpoint in &self.endpoints {
            tracing::debug!(endpoint = %endpoint, "trying Overpass endpoint");

            let result = match self.fetcher.fetch(endpoint, query, cancel).await {
                Ok(body) => serde_json::from_str::<OverpassResponse>(&body).map_err(|e| {
                    LocatorError::Deserialize {
                        context: format!("Overpass response from {endpoint}"),
                        source: e,
                    }
                }),
                Err(err) => Err(err),
            };

            match result {
                Ok(response) => {
                    tracing::debug!(
                        endpoint = %endpoint,
                        elements = response.elements.len(),
                        "Overpass endpoint answered"
                    );
                    return Ok(response);
                }
                Err(LocatorError::Cancelled) => return Err(LocatorError::Cancelled),
                Err(err) => {
                    tracing::warn!(endpoint = %endpoint, error = %err, "Overpass endpoint failed");
                    last_error = Some(err);
                }
            }
        }

        Err(LocatorError::AllEndpointsFailed {
            last_error: last_error.map(Box::new),
        })
    }
}
