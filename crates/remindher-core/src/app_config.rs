/// Geocoding service used when `REMINDHER_GEOCODER_URL` is unset.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Country passed to the geocoder alongside every postal code.
pub const DEFAULT_GEOCODER_COUNTRY: &str = "India";

/// Nominatim's usage policy requires an identifying `User-Agent`.
pub const DEFAULT_USER_AGENT: &str = "GynecologistFinderApp/1.0";

/// Equivalent Overpass interpreters, tried in this order.
pub const DEFAULT_OVERPASS_ENDPOINTS: &[&str] = &[
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.openstreetmap.ru/api/interpreter",
];

pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub geocoder_url: String,
    pub geocoder_country: String,
    pub user_agent: String,
    pub overpass_endpoints: Vec<String>,
    pub search_radius_meters: u32,
    /// Hard per-request timeout; also forwarded to Overpass as `[timeout:N]`.
    pub request_timeout_secs: u64,
    /// Total attempts per endpoint, including the first.
    pub max_attempts: u32,
    /// Backoff before retry `n` (0-based) is `retry_backoff_base_secs * 2^(n+1)`.
    pub retry_backoff_base_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_country: DEFAULT_GEOCODER_COUNTRY.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            overpass_endpoints: DEFAULT_OVERPASS_ENDPOINTS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            request_timeout_secs: 60,
            max_attempts: 3,
            retry_backoff_base_secs: 1,
        }
    }
}
