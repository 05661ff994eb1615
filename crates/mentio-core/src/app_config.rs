use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Aspect-extraction strategy, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectMode {
    /// Noun + nearby-descriptor pairing over the polarity lexicon.
    Window,
    /// Category keyword matching.
    Keyword,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub rules_path: PathBuf,
    pub inference_url: Option<String>,
    pub inference_api_key: Option<String>,
    pub aspect_mode: AspectMode,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scrape_timeout_secs: u64,
    pub scrape_user_agent: String,
    pub inference_timeout_secs: u64,
    pub store_timeout_secs: u64,
    pub dashboard_ttl_secs: u64,
    pub dashboard_sample_limit: i64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("rules_path", &self.rules_path)
            .field("database_url", &"[redacted]")
            .field("inference_url", &self.inference_url)
            .field(
                "inference_api_key",
                &self.inference_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("aspect_mode", &self.aspect_mode)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field("scrape_user_agent", &self.scrape_user_agent)
            .field("inference_timeout_secs", &self.inference_timeout_secs)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("dashboard_ttl_secs", &self.dashboard_ttl_secs)
            .field("dashboard_sample_limit", &self.dashboard_sample_limit)
            .finish()
    }
}
