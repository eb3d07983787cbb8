use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let non_empty = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(trimmed.to_string())
    };

    let api_base_url = or_default("ADSCOPE_API_BASE_URL", "https://api.antelopeinc.com/chatbots/");
    validate_http_url("ADSCOPE_API_BASE_URL", &api_base_url)?;

    let analyzer_path = non_empty("ADSCOPE_ANALYZER_PATH", "adsStrategyAnalyzer_testing")?;
    let validate_path = non_empty("ADSCOPE_VALIDATE_PATH", "validate")?;

    let library_id = or_default("ADSCOPE_LIBRARY_ID", "999")
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "ADSCOPE_LIBRARY_ID".to_string(),
            reason: e.to_string(),
        })?;

    let page_origin = or_default("ADSCOPE_PAGE_ORIGIN", "http://localhost:5173");
    validate_http_url("ADSCOPE_PAGE_ORIGIN", &page_origin)?;

    let request_timeout_secs = match lookup("ADSCOPE_REQUEST_TIMEOUT_SECS") {
        Ok(raw) if !raw.trim().is_empty() => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: "ADSCOPE_REQUEST_TIMEOUT_SECS".to_string(),
                    reason: e.to_string(),
                })?;
            if secs == 0 {
                return Err(ConfigError::InvalidEnvVar {
                    var: "ADSCOPE_REQUEST_TIMEOUT_SECS".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            Some(secs)
        }
        _ => None,
    };

    let user_agent = or_default("ADSCOPE_USER_AGENT", "adscope/0.1 (brand-report-client)");
    let log_level = or_default("ADSCOPE_LOG_LEVEL", "warn");
    let top_tier = or_default("ADSCOPE_TOP_TIER", crate::catalog::DEFAULT_TOP_TIER);

    Ok(AppConfig {
        api_base_url,
        analyzer_path,
        validate_path,
        library_id,
        page_origin,
        request_timeout_secs,
        user_agent,
        log_level,
        top_tier,
    })
}

/// Rejects values that are not absolute `http(s)` URLs with a host.
fn validate_http_url(var: &str, value: &str) -> Result<(), ConfigError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    let host = rest.map(|r| r.split(['/', '?', '#']).next().unwrap_or_default());
    match host {
        Some(h) if !h.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("'{value}' is not an absolute http(s) URL"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
