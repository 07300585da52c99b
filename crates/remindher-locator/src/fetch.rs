//! Deadline- and cancellation-aware HTTP plumbing.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::error::LocatorError;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// Drives `request` until it completes, `timeout` elapses, or `cancel` fires.
///
/// Losing either race drops `request`, which aborts the underlying
/// connection rather than leaving it running in the background.
pub(crate) async fn run_with_deadline<T, Fut>(
    url: &str,
    timeout: Duration,
    cancel: &CancellationToken,
    request: Fut,
) -> Result<T, LocatorError>
where
    Fut: Future<Output = Result<T, LocatorError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(LocatorError::Cancelled),
        result = tokio::time::timeout(timeout, request) => match result {
            Ok(inner) => inner,
            Err(_) => Err(LocatorError::Timeout {
                url: url.to_owned(),
                timeout,
            }),
        },
    }
}

/// POSTs Overpass QL to one endpoint with per-attempt deadlines and
/// exponential back-off between attempts.
///
/// Holds only configuration and a pooled [`Client`]; concurrent calls share
/// nothing mutable.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    policy: RetryPolicy,
}

impl FetchClient {
    #[must_use]
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends `query` to `endpoint`, retrying per the configured [`RetryPolicy`].
    ///
    /// Returns the raw response body of the first 2xx answer.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::ExhaustedRetries`] once every attempt has failed; its
    ///   source is the final attempt's error.
    /// - [`LocatorError::Cancelled`] if `cancel` fires during a request or a
    ///   back-off sleep.
    pub async fn fetch(
        &self,
        endpoint: &Url,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<String, LocatorError> {
        retry_with_backoff(&self.policy, cancel, endpoint.as_str(), move |attempt| {
            self.attempt(endpoint, query, attempt, cancel)
        })
        .await
    }

    async fn attempt(
        &self,
        endpoint: &Url,
        query: &str,
        attempt: u32,
        cancel: &CancellationToken,
    ) -> Result<String, LocatorError> {
        tracing::debug!(endpoint = %endpoint, attempt, "posting facility query");

        let request = async {
            let response = self
                .client
                .post(endpoint.clone())
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(query.to_owned())
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(LocatorError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: endpoint.to_string(),
                });
            }

            Ok(response.text().await?)
        };

        run_with_deadline(endpoint.as_str(), self.policy.attempt_timeout, cancel, request).await
    }
}
