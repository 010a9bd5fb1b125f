use crate::app_config::{AppConfig, Environment};
use crate::view::{CardDensity, Theme, ViewConfig};
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
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `.env` templates can leave keys empty.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("POPMAP_ENV", "development"))?;

    let bind_addr = parse("POPMAP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("POPMAP_LOG_LEVEL", "info");

    let snapshot_url = optional("POPMAP_SNAPSHOT_URL");
    if let Some(url) = &snapshot_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(
                "POPMAP_SNAPSHOT_URL",
                format!("'{url}' is not an http(s) URL"),
            ));
        }
    }
    let snapshot_path = PathBuf::from(or_default("POPMAP_SNAPSHOT_PATH", "./public/stores.json"));
    let fallback_path = optional("POPMAP_FALLBACK_PATH").map(PathBuf::from);

    let request_timeout_secs = parse_u64("POPMAP_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("POPMAP_USER_AGENT", "popmap/0.1 (dessert-map)");
    let refresh_cron = optional("POPMAP_REFRESH_CRON");

    let theme = or_default("POPMAP_THEME", "cream")
        .parse::<Theme>()
        .map_err(|reason| invalid("POPMAP_THEME", reason))?;
    let card_density = or_default("POPMAP_CARD_DENSITY", "comfortable")
        .parse::<CardDensity>()
        .map_err(|reason| invalid("POPMAP_CARD_DENSITY", reason))?;
    let marker_cap = match optional("POPMAP_MARKER_CAP") {
        None => None,
        Some(raw) => match raw.parse::<usize>() {
            Ok(0) => return Err(invalid("POPMAP_MARKER_CAP", "must be at least 1".to_string())),
            Ok(cap) => Some(cap),
            Err(e) => return Err(invalid("POPMAP_MARKER_CAP", e.to_string())),
        },
    };

    let collect_config_path = PathBuf::from(or_default(
        "POPMAP_COLLECT_CONFIG_PATH",
        "./config/collect.yaml",
    ));
    let naver_client_id = optional("NAVER_CLIENT_ID");
    let naver_client_secret = optional("NAVER_CLIENT_SECRET");
    let collect_delay_ms = parse_u64("POPMAP_COLLECT_DELAY_MS", "200")?;
    let collect_max_retries = parse_u32("POPMAP_COLLECT_MAX_RETRIES", "3")?;
    let collect_backoff_base_ms = parse_u64("POPMAP_COLLECT_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        snapshot_url,
        snapshot_path,
        fallback_path,
        request_timeout_secs,
        user_agent,
        refresh_cron,
        view: ViewConfig {
            theme,
            card_density,
            marker_cap,
            ..ViewConfig::default()
        },
        collect_config_path,
        naver_client_id,
        naver_client_secret,
        collect_delay_ms,
        collect_max_retries,
        collect_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "POPMAP_ENV".to_string(),
            reason: format!(
                "unknown environment '{other}'; expected development, test, or production"
            ),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
