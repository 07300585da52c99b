//! Postal code → nearby healthcare facility search.
//!
//! The pipeline geocodes a postal code ([`CoordinateResolver`]), builds an
//! Overpass QL query around the result ([`QueryBuilder`]), runs it against a
//! fixed list of equivalent endpoints with retries ([`EndpointFailover`],
//! [`FetchClient`]), and normalizes the raw elements into
//! [`remindher_core::Facility`] records. [`FacilitySearch`] ties the stages
//! together and reports a [`SearchOutcome`].

pub mod error;
pub mod failover;
pub mod fetch;
pub mod geocode;
pub mod normalize;
pub mod query;
pub mod retry;
pub mod search;
pub mod types;

pub use error::{ErrorKind, LocatorError};
pub use failover::EndpointFailover;
pub use fetch::FetchClient;
pub use geocode::CoordinateResolver;
pub use normalize::{normalize_element, normalize_elements, parse_elements};
pub use query::{FacilityQuery, QueryBuilder};
pub use retry::RetryPolicy;
pub use search::{
    user_message, FacilitySearch, SearchConfig, SearchOutcome, BUSY_MESSAGE, CANCELLED_MESSAGE,
    UNAVAILABLE_MESSAGE,
};
pub use types::{OverpassResponse, RawElement};
