//! Wire types for the Nominatim and Overpass APIs.
//!
//! These structs mirror the subset of each provider's JSON that the pipeline
//! reads. Every field the providers may omit is an `Option`, so validation
//! happens in [`crate::normalize`] rather than at deserialization time.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// One match from the Nominatim `/search` endpoint.
///
/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

/// Top-level Overpass JSON response.
///
/// Elements are kept as raw JSON so one malformed element cannot fail the
/// whole response; see [`crate::normalize::parse_elements`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    /// An absent or `null` list reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub elements: Vec<serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A node or way returned by Overpass.
///
/// Nodes carry `lat`/`lon` directly; ways carry a `center` when the query
/// ends with `out center`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawElement {
    /// `"node"`, `"way"`, or `"relation"`.
    #[serde(rename = "type", default)]
    pub element_type: Option<String>,
    pub id: u64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<RawCenter>,
    #[serde(default)]
    pub tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawCenter {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}
