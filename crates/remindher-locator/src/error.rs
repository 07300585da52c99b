use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Errors returned by the facility search pipeline.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The postal code was empty after trimming; no request was made.
    #[error("Pincode is required")]
    MissingPostalCode,

    /// The geocoder returned zero matches for the postal code.
    #[error("Pincode not found: {postal_code}")]
    NotFound { postal_code: String },

    /// A single request exceeded its hard deadline and was dropped.
    #[error("request timeout after {timeout:?}: {url}")]
    Timeout { url: String, timeout: Duration },

    /// Every attempt against one endpoint failed.
    #[error("{url} failed after {attempts} attempt(s): {source}")]
    ExhaustedRetries {
        url: String,
        attempts: u32,
        #[source]
        source: Box<LocatorError>,
    },

    /// Every configured Overpass endpoint exhausted its retries.
    #[error("All Overpass endpoints failed. Last error: {}", describe_last(.last_error))]
    AllEndpointsFailed {
        #[source]
        last_error: Option<Box<LocatorError>>,
    },

    /// The caller cancelled the search.
    #[error("search cancelled")]
    Cancelled,

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A configured service URL could not be parsed.
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[allow(clippy::ref_option)]
fn describe_last(last_error: &Option<Box<LocatorError>>) -> String {
    last_error
        .as_ref()
        .map_or_else(|| "Unknown error".to_string(), ToString::to_string)
}

/// Coarse classification of a [`LocatorError`], reported in
/// [`crate::SearchOutcome::Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Network,
    Timeout,
    ExhaustedRetries,
    AllEndpointsFailed,
    Cancelled,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::ExhaustedRetries => write!(f, "exhausted_retries"),
            ErrorKind::AllEndpointsFailed => write!(f, "all_endpoints_failed"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl LocatorError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            LocatorError::Http(e) if e.is_timeout() => ErrorKind::Timeout,
            LocatorError::Http(_)
            | LocatorError::UnexpectedStatus { .. }
            | LocatorError::Deserialize { .. }
            | LocatorError::InvalidUrl { .. } => ErrorKind::Network,
            LocatorError::NotFound { .. } | LocatorError::MissingPostalCode => ErrorKind::NotFound,
            LocatorError::Timeout { .. } => ErrorKind::Timeout,
            LocatorError::ExhaustedRetries { .. } => ErrorKind::ExhaustedRetries,
            LocatorError::AllEndpointsFailed { .. } => ErrorKind::AllEndpointsFailed,
            LocatorError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// HTTP status of the innermost failure, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            LocatorError::UnexpectedStatus { status, .. } => Some(*status),
            LocatorError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => self.inner().and_then(LocatorError::status),
        }
    }

    /// Returns `true` when the failure chain bottoms out in a gateway
    /// timeout (HTTP 504) or a request deadline.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        let mut current = Some(self);
        while let Some(err) = current {
            match err {
                LocatorError::Timeout { .. }
                | LocatorError::UnexpectedStatus { status: 504, .. } => return true,
                LocatorError::Http(e)
                    if e.is_timeout() || e.status().is_some_and(|s| s.as_u16() == 504) =>
                {
                    return true;
                }
                _ => {}
            }
            current = err.inner();
        }
        false
    }

    fn inner(&self) -> Option<&LocatorError> {
        match self {
            LocatorError::ExhaustedRetries { source, .. } => Some(&**source),
            LocatorError::AllEndpointsFailed {
                last_error: Some(last),
            } => Some(&**last),
            _ => None,
        }
    }
}
