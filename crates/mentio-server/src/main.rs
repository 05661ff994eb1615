mod api;
mod dashboard;
mod ingest;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mentio_sentiment::{select_aspect_extractor, Analyzer, InferenceClient};

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    dashboard::StatsCache,
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(mentio_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = mentio_db::PoolConfig::from_app_config(&config);
    let pool = mentio_db::connect_pool(&config.database_url, pool_config).await?;
    mentio_db::run_migrations(&pool).await?;

    let store = mentio_db::PgStore::new(pool.clone(), config.store_timeout_secs);

    let backend = match &config.inference_url {
        Some(url) => Some(InferenceClient::new(
            url,
            config.inference_api_key.clone(),
            config.inference_timeout_secs,
        )?),
        None => {
            tracing::info!("no inference backend configured; heuristic analysis only");
            None
        }
    };
    let analyzer = Arc::new(Analyzer::new(
        backend,
        select_aspect_extractor(config.aspect_mode),
    ));

    let rules = Arc::new(mentio_core::load_rules(&config.rules_path)?);
    tracing::info!(rules = rules.len(), "alert rules loaded");

    let sources =
        mentio_scraper::SourceClient::new(&config.scrape_user_agent, config.scrape_timeout_secs)?;

    let state = AppState {
        pool,
        store,
        analyzer,
        rules,
        sources,
        stats_cache: StatsCache::new(std::time::Duration::from_secs(config.dashboard_ttl_secs)),
        config: Arc::clone(&config),
    };

    let _scheduler = scheduler::build_scheduler(state.clone()).await?;

    let auth = AuthState::from_env(matches!(config.env, mentio_core::Environment::Development))?;
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
