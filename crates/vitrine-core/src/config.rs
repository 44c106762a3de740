use crate::app_config::AppConfig;
use crate::pagination::PAGE_SIZE_OPTIONS;
use crate::ConfigError;

const DEFAULT_API_URL: &str = "http://api.valantis.store:40000/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_password = require("VITRINE_API_PASSWORD")?;
    let api_url = or_default("VITRINE_API_URL", DEFAULT_API_URL);
    let log_level = or_default("VITRINE_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("VITRINE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("VITRINE_USER_AGENT", "vitrine/0.1 (catalog-browser)");
    let client_max_retries = parse_u32("VITRINE_CLIENT_MAX_RETRIES", "2")?;
    let client_backoff_base_ms = parse_u64("VITRINE_CLIENT_BACKOFF_BASE_MS", "250")?;
    let browse_max_retries = parse_u32("VITRINE_BROWSE_MAX_RETRIES", "3")?;
    let browse_retry_delay_ms = parse_u64("VITRINE_BROWSE_RETRY_DELAY_MS", "2000")?;
    let page_size = parse_page_size(&or_default("VITRINE_PAGE_SIZE", "50"))?;

    Ok(AppConfig {
        api_url,
        api_password,
        log_level,
        request_timeout_secs,
        user_agent,
        client_max_retries,
        client_backoff_base_ms,
        browse_max_retries,
        browse_retry_delay_ms,
        page_size,
    })
}

/// Parse a page size, accepting only the sizes offered by the size selector.
fn parse_page_size(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "VITRINE_PAGE_SIZE".to_string(),
        reason,
    };
    let size = raw
        .parse::<usize>()
        .map_err(|e| invalid(e.to_string()))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(invalid(format!(
            "{size} is not one of {PAGE_SIZE_OPTIONS:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("VITRINE_API_PASSWORD", "Valantis");
        m
    }

    #[test]
    fn build_app_config_fails_without_password() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "VITRINE_API_PASSWORD"),
            "expected MissingEnvVar(VITRINE_API_PASSWORD), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_treats_blank_password_as_missing() {
        let mut map = HashMap::new();
        map.insert("VITRINE_API_PASSWORD", "   ");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.api_url, "http://api.valantis.store:40000/");
        assert_eq!(cfg.api_password, "Valantis");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "vitrine/0.1 (catalog-browser)");
        assert_eq!(cfg.client_max_retries, 2);
        assert_eq!(cfg.client_backoff_base_ms, 250);
        assert_eq!(cfg.browse_max_retries, 3);
        assert_eq!(cfg.browse_retry_delay_ms, 2000);
        assert_eq!(cfg.page_size, 50);
    }

    #[test]
    fn overrides_are_applied() {
        let mut map = full_env();
        map.insert("VITRINE_API_URL", "http://localhost:4000");
        map.insert("VITRINE_CLIENT_MAX_RETRIES", "5");
        map.insert("VITRINE_BROWSE_RETRY_DELAY_MS", "10");
        map.insert("VITRINE_PAGE_SIZE", "20");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:4000");
        assert_eq!(cfg.client_max_retries, 5);
        assert_eq!(cfg.browse_retry_delay_ms, 10);
        assert_eq!(cfg.page_size, 20);
    }

    #[test]
    fn invalid_retry_count_is_rejected() {
        let mut map = full_env();
        map.insert("VITRINE_CLIENT_MAX_RETRIES", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_CLIENT_MAX_RETRIES"),
            "expected InvalidEnvVar(VITRINE_CLIENT_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn page_size_outside_options_is_rejected() {
        let mut map = full_env();
        map.insert("VITRINE_PAGE_SIZE", "7");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_PAGE_SIZE"),
            "expected InvalidEnvVar(VITRINE_PAGE_SIZE), got: {result:?}"
        );
    }

    #[test]
    fn debug_redacts_password() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("Valantis"), "password leaked: {rendered}");
        assert!(rendered.contains("[redacted]"));
    }
}
