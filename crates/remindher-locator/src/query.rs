//! Overpass QL construction for healthcare facilities around a coordinate.

use std::collections::BTreeSet;
use std::fmt;

use remindher_core::{Coordinate, DEFAULT_SEARCH_RADIUS_METERS};

pub const DEFAULT_CATEGORIES: [&str; 2] = ["hospital", "clinic"];

/// Case-insensitive name fragments that mark a women's-health facility.
pub const DEFAULT_NAME_PATTERNS: [&str; 5] = [
    "gynaecology",
    "gynaecologist",
    "women",
    "maternity",
    "obstetric",
];

/// Server-side evaluation budget sent in the `[timeout:..]` setting.
pub const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 60;

/// A bounded-radius facility query. Render it with [`fmt::Display`].
///
/// Categories and name patterns are ordered sets, so rendering is
/// deterministic for a given configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityQuery {
    pub center: Coordinate,
    pub radius_meters: u32,
    pub category_filters: BTreeSet<String>,
    /// Regex fragments matched case-insensitively against the `name` tag.
    pub name_patterns: BTreeSet<String>,
    pub server_timeout_secs: u64,
}

impl FacilityQuery {
    fn around(&self) -> String {
        format!(
            "(around:{},{},{})",
            self.radius_meters, self.center.latitude, self.center.longitude
        )
    }
}

impl fmt::Display for FacilityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let around = self.around();
        writeln!(f, "[out:json][timeout:{}];", self.server_timeout_secs)?;
        writeln!(f, "(")?;
        for element in ["node", "way"] {
            for category in &self.category_filters {
                writeln!(
                    f,
                    "  {element}[\"amenity\"=\"{}\"]{around};",
                    escape_ql(category)
                )?;
            }
        }
        if !self.name_patterns.is_empty() {
            let alternation = self
                .name_patterns
                .iter()
                .map(|p| escape_ql(p))
                .collect::<Vec<_>>()
                .join("|");
            writeln!(f, "  node[\"name\"~\"{alternation}\",i]{around};")?;
        }
        writeln!(f, ");")?;
        write!(f, "out center meta;")
    }
}

/// Escapes a value for use inside a double-quoted QL string literal.
fn escape_ql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds [`FacilityQuery`] values from fixed configuration.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    radius_meters: u32,
    categories: BTreeSet<String>,
    name_patterns: BTreeSet<String>,
    server_timeout_secs: u64,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_RADIUS_METERS)
    }
}

impl QueryBuilder {
    #[must_use]
    pub fn new(radius_meters: u32) -> Self {
        Self {
            radius_meters,
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
            name_patterns: DEFAULT_NAME_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            server_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_name_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_server_timeout_secs(mut self, secs: u64) -> Self {
        self.server_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    #[must_use]
    pub fn build(&self, center: &Coordinate) -> FacilityQuery {
        FacilityQuery {
            center: center.clone(),
            radius_meters: self.radius_meters,
            category_filters: self.categories.clone(),
            name_patterns: self.name_patterns.clone(),
            server_timeout_secs: self.server_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> Coordinate {
        Coordinate {
            latitude: 28.6139,
            longitude: 77.209,
            display_name: "New Delhi".to_owned(),
        }
    }

    #[test]
    fn default_query_renders_expected_ql() {
        let ql = QueryBuilder::default().build(&delhi()).to_string();
        let expected = "\
[out:json][timeout:60];
(
  node[\"amenity\"=\"clinic\"](around:10000,28.6139,77.209);
  node[\"amenity\"=\"hospital\"](around:10000,28.6139,77.209);
  way[\"amenity\"=\"clinic\"](around:10000,28.6139,77.209);
  way[\"amenity\"=\"hospital\"](around:10000,28.6139,77.209);
  node[\"name\"~\"gynaecologist|gynaecology|maternity|obstetric|women\",i](around:10000,28.6139,77.209);
);
out center meta;";
        assert_eq!(ql, expected);
    }

    #[test]
    fn build_is_deterministic() {
        let builder = QueryBuilder::default();
        assert_eq!(builder.build(&delhi()), builder.build(&delhi()));
        assert_eq!(
            builder.build(&delhi()).to_string(),
            builder.build(&delhi()).to_string()
        );
    }

    #[test]
    fn requests_way_centers() {
        let ql = QueryBuilder::default().build(&delhi()).to_string();
        assert!(ql.ends_with("out center meta;"));
    }

    #[test]
    fn radius_is_configurable() {
        let query = QueryBuilder::new(2_500).build(&delhi());
        assert_eq!(query.radius_meters, 2_500);
        assert!(query.to_string().contains("(around:2500,"));
    }

    #[test]
    fn empty_name_patterns_omit_the_name_clause() {
        let ql = QueryBuilder::default()
            .with_name_patterns(Vec::<String>::new())
            .build(&delhi())
            .to_string();
        assert!(!ql.contains("\"name\""));
    }

    #[test]
    fn custom_categories_and_timeout() {
        let ql = QueryBuilder::default()
            .with_categories(["doctors"])
            .with_server_timeout_secs(25)
            .build(&delhi())
            .to_string();
        assert!(ql.starts_with("[out:json][timeout:25];"));
        assert!(ql.contains("way[\"amenity\"=\"doctors\"]"));
        assert!(!ql.contains("hospital"));
    }

    #[test]
    fn quotes_in_filters_are_escaped() {
        let ql = QueryBuilder::default()
            .with_name_patterns([r#"st "mary""#])
            .build(&delhi())
            .to_string();
        assert!(ql.contains(r#"node["name"~"st \"mary\"",i]"#), "got {ql}");
    }
}
