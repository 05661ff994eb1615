//! One ingestion run: orchestrated scrape followed synchronously by the
//! analysis pipeline. Shared by the HTTP handler, the scheduler, and the
//! CLI-style one-shot paths.

use mentio_core::{AlertRule, MentionStore, ProductRecord};
use mentio_scraper::{scrape_all, ScrapeRequest, SourceClient, SourceCount};
use mentio_sentiment::{ingest_batch, Analyzer, IngestSummary, SentimentBackend};

/// Combined scrape + pipeline result for one product.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub per_source: Vec<SourceCount>,
    pub summary: IngestSummary,
}

/// Scrape all sources the product tracks and run the batch through the
/// pipeline. Never fails as a whole; degraded sources and per-item store
/// failures are reflected in the outcome's counts.
pub async fn run_ingest<S, B>(
    sources: &SourceClient,
    store: &S,
    analyzer: &Analyzer<B>,
    rules: &[AlertRule],
    product: &ProductRecord,
    keywords_override: Option<Vec<String>>,
    target_url: Option<String>,
) -> IngestOutcome
where
    S: MentionStore,
    B: SentimentBackend,
{
    let mut keywords = keywords_override.unwrap_or_else(|| product.keywords.clone());
    keywords.retain(|k| !k.trim().is_empty());
    if keywords.is_empty() {
        keywords.push(product.name.clone());
    }

    let request = ScrapeRequest {
        keywords,
        target_url,
        video: product.track_video,
        forum: product.track_forum,
        microblog: product.track_microblog,
    };

    tracing::info!(
        product = %product.slug,
        keywords = request.keywords.len(),
        "starting ingestion run"
    );

    let batch = scrape_all(sources, &request).await;
    let per_source = batch.per_source.clone();

    let summary = ingest_batch(store, analyzer, rules, product.id, batch.mentions).await;

    IngestOutcome {
        per_source,
        summary,
    }
}
