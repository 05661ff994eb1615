//! Core domain types, configuration, and the persistence contract for mentio.
//!
//! Everything the pipeline and dashboard need from the outside world is
//! expressed here: the [`store::MentionStore`] trait is the only surface the
//! ingestion core uses to talk to a datastore, and [`AppConfig`] is the only
//! way runtime knobs enter the system.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod domain;
pub mod rules;
pub mod store;

pub use app_config::{AppConfig, AspectMode, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use domain::{
    AnalysisSample, AspectAverage, AspectScore, CredibilityReport, DashboardSnapshot,
    EmotionSlice, EmotionWeight, KeywordCount, NewAlert, NewProduct, NewReview, NewTopic,
    PlatformCount, ProductRecord, RawMention, RecentReview, Scope, SentimentAnalysis,
    SentimentLabel, Severity, SourceKind, StoredReview,
};
pub use rules::{default_rules, load_rules, AlertRule};
pub use store::{MentionStore, SampleWindow, StoreError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),
    #[error("validation error: {0}")]
    Validation(String),
}
