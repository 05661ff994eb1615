//! Offline unit tests for mentio-db pool configuration and row mapping.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use mentio_core::{AppConfig, AspectMode, Environment};
use mentio_db::PoolConfig;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        rules_path: PathBuf::from("./config/alert_rules.yaml"),
        inference_url: None,
        inference_api_key: None,
        aspect_mode: AspectMode::Window,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scrape_timeout_secs: 20,
        scrape_user_agent: "ua".to_string(),
        inference_timeout_secs: 10,
        store_timeout_secs: 5,
        dashboard_ttl_secs: 10,
        dashboard_sample_limit: 200,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn pool_config_default_is_sane() {
    let config = PoolConfig::default();
    assert!(config.max_connections >= config.min_connections);
    assert!(config.acquire_timeout_secs > 0);
}
