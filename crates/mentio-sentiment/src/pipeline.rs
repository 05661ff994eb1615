//! The ingestion pipeline: normalize → dedup → analyze → persist.
//!
//! 1. Clean each raw mention in arrival order; drop content-free input.
//! 2. Fingerprint the cleaned text and skip items already stored for this
//!    product (idempotent re-ingestion — a duplicate is a no-op, never an
//!    error).
//! 3. Analyze through the cached engine.
//! 4. Write the review and its analysis; a store failure affects that item
//!    only.
//! 5. After the write loop commits: evaluate alert rules and extract batch
//!    topics, each with independent failure handling — neither can fail the
//!    ingestion itself.

use mentio_core::{AlertRule, MentionStore, NewReview, RawMention};

use crate::alerts::evaluate_rules;
use crate::engine::Analyzer;
use crate::inference::SentimentBackend;
use crate::normalize::{fingerprint, normalize};
use crate::topics::extract_topics;

/// Topics recorded per ingested batch.
const MAX_BATCH_TOPICS: usize = 10;

/// Outcome of one ingestion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Raw mentions handed to the pipeline.
    pub total_scraped: usize,
    /// Reviews written (with analyses).
    pub total_saved: usize,
    /// Items skipped because their fingerprint was already stored.
    pub duplicates: usize,
    /// Items dropped by normalization (no linguistic content).
    pub filtered: usize,
    /// Items lost to store failures.
    pub failed: usize,
}

/// Run one batch of raw mentions through the pipeline for a product.
///
/// Never fails as a whole: per-item errors are logged and counted in the
/// summary, and the post-commit phases (alerts, topics) degrade silently to
/// warnings.
pub async fn ingest_batch<S, B>(
    store: &S,
    analyzer: &Analyzer<B>,
    rules: &[AlertRule],
    product_id: i64,
    mentions: Vec<RawMention>,
) -> IngestSummary
where
    S: MentionStore,
    B: SentimentBackend,
{
    let mut summary = IngestSummary {
        total_scraped: mentions.len(),
        ..IngestSummary::default()
    };

    if mentions.is_empty() {
        return summary;
    }

    // (review_id, cleaned_text, analysis) for the post-commit phases.
    let mut analyzed: Vec<(i64, String, mentio_core::SentimentAnalysis)> = Vec::new();

    for mention in mentions {
        let Some(cleaned) = normalize(&mention.text) else {
            summary.filtered += 1;
            continue;
        };
        let fp = fingerprint(&cleaned);

        match store.find_review_by_fingerprint(product_id, &fp).await {
            Ok(Some(_)) => {
                tracing::debug!(product_id, fingerprint = %fp, "duplicate mention skipped");
                summary.duplicates += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                // Proceed to the insert: its fingerprint conflict handling
                // makes a redundant write a no-op, so a failed read never
                // causes a duplicate row.
                tracing::warn!(product_id, error = %e, "fingerprint lookup failed");
            }
        }

        let analysis = analyzer.analyze(&fp, &cleaned).await;

        let review = NewReview {
            product_id,
            fingerprint: fp,
            text: cleaned.clone(),
            source: mention.source,
            author: mention.author,
            url: mention.url,
            posted_at: mention.posted_at,
            likes: mention.likes,
            replies: mention.replies,
            reposts: mention.reposts,
        };

        match store.insert_review(review).await {
            Ok(Some(stored)) => {
                if let Err(e) = store.insert_analysis(stored.id, &analysis).await {
                    tracing::error!(
                        review_id = stored.id,
                        error = %e,
                        "review saved but analysis write failed"
                    );
                }
                summary.total_saved += 1;
                analyzed.push((stored.id, cleaned, analysis));
            }
            Ok(None) => {
                summary.duplicates += 1;
            }
            Err(e) => {
                tracing::warn!(product_id, error = %e, "review write failed; item dropped");
                summary.failed += 1;
            }
        }
    }

    run_alert_phase(store, rules, product_id, &analyzed).await;
    run_topic_phase(store, product_id, &analyzed).await;

    tracing::info!(
        product_id,
        scraped = summary.total_scraped,
        saved = summary.total_saved,
        duplicates = summary.duplicates,
        filtered = summary.filtered,
        failed = summary.failed,
        "ingestion batch complete"
    );

    summary
}

/// Evaluate alert rules for every newly analyzed mention. A failed alert
/// write never fails the ingestion of the review itself.
async fn run_alert_phase<S: MentionStore>(
    store: &S,
    rules: &[AlertRule],
    product_id: i64,
    analyzed: &[(i64, String, mentio_core::SentimentAnalysis)],
) {
    for (review_id, cleaned, analysis) in analyzed {
        let Some(alert) = evaluate_rules(rules, product_id, cleaned, analysis) else {
            continue;
        };

        tracing::info!(
            product_id,
            review_id,
            kind = %alert.kind,
            severity = %alert.severity,
            "alert triggered"
        );

        if let Err(e) = store.insert_alert(alert).await {
            tracing::warn!(review_id, error = %e, "alert write failed");
        }
    }
}

/// Record the batch's top terms as topic clusters.
async fn run_topic_phase<S: MentionStore>(
    store: &S,
    product_id: i64,
    analyzed: &[(i64, String, mentio_core::SentimentAnalysis)],
) {
    let texts: Vec<&str> = analyzed.iter().map(|(_, text, _)| text.as_str()).collect();
    let topics = extract_topics(&texts, MAX_BATCH_TOPICS);

    if topics.is_empty() {
        return;
    }

    if let Err(e) = store.insert_topics(Some(product_id), &topics).await {
        tracing::warn!(product_id, error = %e, "topic write failed");
    }
}
