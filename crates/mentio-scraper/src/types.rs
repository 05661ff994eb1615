//! Orchestrator input and output shapes.

use mentio_core::{RawMention, SourceKind};

/// One scrape run's input: the keywords to search for and which sources to
/// query. `target_url` narrows the video adapter to a single page.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub keywords: Vec<String>,
    pub target_url: Option<String>,
    pub video: bool,
    pub forum: bool,
    pub microblog: bool,
}

impl ScrapeRequest {
    /// A request covering all sources for the given keywords.
    #[must_use]
    pub fn all_sources(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            target_url: None,
            video: true,
            forum: true,
            microblog: true,
        }
    }
}

/// How many raw mentions one source contributed. A failed or timed-out
/// source is present with a count of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCount {
    pub source: SourceKind,
    pub count: usize,
}

/// Merged output of one orchestrated scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeBatch {
    /// Mentions from all sources, cross-source duplicates (same URL) removed.
    pub mentions: Vec<RawMention>,
    pub per_source: Vec<SourceCount>,
}

impl ScrapeBatch {
    #[must_use]
    pub fn total_scraped(&self) -> usize {
        self.per_source.iter().map(|c| c.count).sum()
    }
}
