use crate::app_config::{AppConfig, AspectMode, Environment};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("MENTIO_ENV", "development"));

    let bind_addr = parse_addr("MENTIO_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MENTIO_LOG_LEVEL", "info");
    let rules_path = PathBuf::from(or_default("MENTIO_RULES_PATH", "./config/alert_rules.yaml"));

    let inference_url = lookup("MENTIO_INFERENCE_URL").ok();
    let inference_api_key = lookup("MENTIO_INFERENCE_API_KEY").ok();

    let aspect_mode = parse_aspect_mode(&or_default("MENTIO_ASPECT_MODE", "window"))?;

    let db_max_connections = parse_u32("MENTIO_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("MENTIO_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("MENTIO_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scrape_timeout_secs = parse_u64("MENTIO_SCRAPE_TIMEOUT_SECS", "20")?;
    let scrape_user_agent = or_default("MENTIO_SCRAPE_USER_AGENT", "mentio/0.1 (opinion-monitor)");
    let inference_timeout_secs = parse_u64("MENTIO_INFERENCE_TIMEOUT_SECS", "10")?;
    let store_timeout_secs = parse_u64("MENTIO_STORE_TIMEOUT_SECS", "5")?;
    let dashboard_ttl_secs = parse_u64("MENTIO_DASHBOARD_TTL_SECS", "10")?;
    let dashboard_sample_limit = parse_i64("MENTIO_DASHBOARD_SAMPLE_LIMIT", "200")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        rules_path,
        inference_url,
        inference_api_key,
        aspect_mode,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scrape_timeout_secs,
        scrape_user_agent,
        inference_timeout_secs,
        store_timeout_secs,
        dashboard_ttl_secs,
        dashboard_sample_limit,
    })
}

fn parse_environment(raw: &str) -> Environment {
    match raw.to_lowercase().as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_aspect_mode(raw: &str) -> Result<AspectMode, ConfigError> {
    match raw.to_lowercase().as_str() {
        "window" => Ok(AspectMode::Window),
        "keyword" => Ok(AspectMode::Keyword),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MENTIO_ASPECT_MODE".to_string(),
            reason: format!("unknown aspect mode '{other}'; expected 'window' or 'keyword'"),
        }),
    }
}
