use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables fall back to [`AppConfig::default`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let or_default = |var: &str, default: String| -> String {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    };

    let log_level = or_default("REMINDHER_LOG_LEVEL", defaults.log_level);
    let geocoder_url = or_default("REMINDHER_GEOCODER_URL", defaults.geocoder_url);
    let geocoder_country = or_default("REMINDHER_GEOCODER_COUNTRY", defaults.geocoder_country);
    let user_agent = or_default("REMINDHER_USER_AGENT", defaults.user_agent);

    let overpass_endpoints = match lookup("REMINDHER_OVERPASS_ENDPOINTS") {
        Ok(raw) => parse_endpoint_list(&raw)?,
        Err(_) => defaults.overpass_endpoints,
    };

    let search_radius_meters =
        parse_u32("REMINDHER_SEARCH_RADIUS_METERS", defaults.search_radius_meters)?;
    let request_timeout_secs =
        parse_u64("REMINDHER_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    let max_attempts = parse_u32("REMINDHER_MAX_ATTEMPTS", defaults.max_attempts)?;
    let retry_backoff_base_secs = parse_u64(
        "REMINDHER_RETRY_BACKOFF_BASE_SECS",
        defaults.retry_backoff_base_secs,
    )?;

    if search_radius_meters == 0 {
        return Err(invalid(
            "REMINDHER_SEARCH_RADIUS_METERS",
            "must be greater than zero".to_string(),
        ));
    }
    if request_timeout_secs == 0 {
        return Err(invalid(
            "REMINDHER_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    if max_attempts == 0 {
        return Err(invalid(
            "REMINDHER_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        log_level,
        geocoder_url,
        geocoder_country,
        user_agent,
        overpass_endpoints,
        search_radius_meters,
        request_timeout_secs,
        max_attempts,
        retry_backoff_base_secs,
    })
}

/// Split a comma-separated endpoint list, dropping blanks.
fn parse_endpoint_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let endpoints: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if endpoints.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "REMINDHER_OVERPASS_ENDPOINTS".to_string(),
            reason: "at least one endpoint is required".to_string(),
        });
    }

    if let Some(bad) = endpoints
        .iter()
        .find(|e| !(e.starts_with("http://") || e.starts_with("https://")))
    {
        return Err(ConfigError::InvalidEnvVar {
            var: "REMINDHER_OVERPASS_ENDPOINTS".to_string(),
            reason: format!("\"{bad}\" is not an http(s) URL"),
        });
    }

    Ok(endpoints)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
