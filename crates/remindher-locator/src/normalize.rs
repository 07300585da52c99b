//! Normalization of raw Overpass elements into [`Facility`] records.

use std::collections::BTreeMap;

use remindher_core::Facility;

use crate::types::RawElement;

pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

const ADDRESS_KEYS: [&str; 5] = [
    "addr:housenumber",
    "addr:street",
    "addr:suburb",
    "addr:city",
    "addr:postcode",
];

/// Deserializes raw JSON elements, skipping any that do not match
/// [`RawElement`] (e.g. missing `id`, non-string tag values).
#[must_use]
pub fn parse_elements(values: Vec<serde_json::Value>) -> Vec<RawElement> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawElement>(value) {
            Ok(element) => Some(element),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed Overpass element");
                None
            }
        })
        .collect()
}

/// Converts every usable element into a [`Facility`], preserving input order.
///
/// Elements without a name or without a resolvable location are dropped.
/// Duplicate provider IDs are kept as-is.
#[must_use]
pub fn normalize_elements(elements: &[RawElement]) -> Vec<Facility> {
    elements.iter().filter_map(normalize_element).collect()
}

/// Converts one element, or returns `None` if it has no usable name or
/// location.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn normalize_element(element: &RawElement) -> Option<Facility> {
    let tags = element.tags.as_ref()?;
    let name = non_empty(tags, "name")?;

    let center = element.center.unwrap_or_default();
    let latitude = resolve_axis(element.lat, center.lat);
    let longitude = resolve_axis(element.lon, center.lon);
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }

    Some(Facility {
        id: element.id.to_string(),
        name: name.to_owned(),
        address: build_address(tags),
        phone: tag_or_contact(tags, "phone"),
        website: tag_or_contact(tags, "website"),
        opening_hours: non_empty(tags, "opening_hours").map(str::to_owned),
        latitude,
        longitude,
    })
}

/// Joins the present address parts with `", "`.
#[must_use]
pub fn build_address(tags: &BTreeMap<String, String>) -> String {
    let parts: Vec<&str> = ADDRESS_KEYS
        .iter()
        .filter_map(|key| non_empty(tags, key))
        .collect();
    if parts.is_empty() {
        ADDRESS_NOT_AVAILABLE.to_owned()
    } else {
        parts.join(", ")
    }
}

// A direct coordinate of 0 falls through to the way center.
#[allow(clippy::float_cmp)]
fn resolve_axis(direct: Option<f64>, center: Option<f64>) -> f64 {
    direct
        .filter(|v| *v != 0.0)
        .or(center)
        .unwrap_or(0.0)
}

fn tag_or_contact(tags: &BTreeMap<String, String>, key: &str) -> Option<String> {
    non_empty(tags, key)
        .or_else(|| non_empty(tags, &format!("contact:{key}")))
        .map(str::to_owned)
}

fn non_empty<'a>(tags: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
