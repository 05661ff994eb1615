//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring ingestion job.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use mentio_core::Scope;

use crate::api::AppState;
use crate::ingest::run_ingest;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(state: AppState) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_ingest_job(&scheduler, state).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the hourly ingestion job.
///
/// Runs at the top of every hour (`0 0 * * * *`). Each run reconsiders the
/// full active-product list independently; there is no retry/backoff
/// between runs — a failed source or product simply reduces that run's
/// yield.
async fn register_ingest_job(
    scheduler: &JobScheduler,
    state: AppState,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting hourly ingestion run");
            run_ingest_job(&state).await;
            tracing::info!("scheduler: hourly ingestion run complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Drive one ingestion pass over all active products.
async fn run_ingest_job(state: &AppState) {
    let products = match mentio_db::list_active_products(&state.pool).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to load active products");
            return;
        }
    };

    if products.is_empty() {
        tracing::info!("scheduler: no active products; skipping");
        return;
    }

    tracing::info!(count = products.len(), "scheduler: ingesting products");

    for product in &products {
        let outcome = run_ingest(
            &state.sources,
            &state.store,
            state.analyzer.as_ref(),
            &state.rules,
            product,
            None,
            None,
        )
        .await;

        tracing::info!(
            product = %product.slug,
            scraped = outcome.summary.total_scraped,
            saved = outcome.summary.total_saved,
            duplicates = outcome.summary.duplicates,
            "scheduler: product ingestion finished"
        );

        if outcome.summary.total_saved > 0 {
            state.stats_cache.invalidate(Scope::Product(product.id)).await;
        }
    }
}
