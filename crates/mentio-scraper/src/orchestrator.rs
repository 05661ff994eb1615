//! Concurrent scrape orchestration across all source adapters.

use std::collections::HashSet;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use mentio_core::{RawMention, SourceKind};

use crate::error::ScrapeError;
use crate::sources::{
    fetch_forum_mentions, fetch_microblog_mentions, fetch_video_mentions, SourceClient,
};
use crate::types::{ScrapeBatch, ScrapeRequest, SourceCount};

/// Fan out to every enabled source adapter concurrently and merge the
/// results.
///
/// Each adapter runs under its own timeout; an adapter error or timeout
/// yields an empty result for that source only (logged, count 0). The call
/// as a whole never fails because one source failed — a request with all
/// sources down returns an empty batch with zeroed per-source counts.
///
/// Cross-source duplicates (same URL) are removed before the batch is
/// returned, keeping first-seen order.
pub async fn scrape_all(client: &SourceClient, request: &ScrapeRequest) -> ScrapeBatch {
    let timeout = Duration::from_secs(client.timeout_secs());
    let keywords = &request.keywords;

    let mut tasks: Vec<(
        SourceKind,
        BoxFuture<'_, Result<Vec<RawMention>, ScrapeError>>,
    )> = Vec::new();

    if request.video {
        let target_url = request.target_url.as_deref();
        tasks.push((
            SourceKind::Video,
            fetch_video_mentions(client, keywords, target_url).boxed(),
        ));
    }
    if request.forum {
        tasks.push((
            SourceKind::Forum,
            fetch_forum_mentions(client, keywords).boxed(),
        ));
    }
    if request.microblog {
        tasks.push((
            SourceKind::Microblog,
            fetch_microblog_mentions(client, keywords).boxed(),
        ));
    }

    let bounded = tasks.into_iter().map(|(source, fut)| async move {
        let result = match tokio::time::timeout(timeout, fut).await {
            Ok(inner) => inner,
            Err(_) => Err(ScrapeError::Timeout {
                timeout_secs: timeout.as_secs(),
            }),
        };
        (source, result)
    });

    let outcomes = futures::future::join_all(bounded).await;

    let mut mentions: Vec<RawMention> = Vec::new();
    let mut per_source: Vec<SourceCount> = Vec::new();

    for (source, result) in outcomes {
        match result {
            Ok(source_mentions) => {
                tracing::debug!(
                    source = %source,
                    count = source_mentions.len(),
                    "source adapter returned mentions"
                );
                per_source.push(SourceCount {
                    source,
                    count: source_mentions.len(),
                });
                mentions.extend(source_mentions);
            }
            Err(e) => {
                tracing::warn!(
                    source = %source,
                    error = %e,
                    "source adapter failed; continuing with remaining sources"
                );
                per_source.push(SourceCount { source, count: 0 });
            }
        }
    }

    // Cross-source collisions (same URL surfaced by two platforms) collapse
    // to the first occurrence.
    let mut seen_urls: HashSet<String> = HashSet::new();
    mentions.retain(|mention| match &mention.url {
        Some(url) => seen_urls.insert(url.clone()),
        None => true,
    });

    ScrapeBatch {
        mentions,
        per_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_sources_are_not_queried() {
        let client = SourceClient::new("mentio-test/0.1", 1).expect("client");
        let request = ScrapeRequest {
            keywords: vec!["anything".to_string()],
            target_url: None,
            video: false,
            forum: false,
            microblog: false,
        };

        let batch = scrape_all(&client, &request).await;
        assert!(batch.mentions.is_empty());
        assert!(batch.per_source.is_empty());
        assert_eq!(batch.total_scraped(), 0);
    }
}
