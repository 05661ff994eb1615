//! Microblog search adapter (Mastodon-compatible API).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use mentio_core::{RawMention, SourceKind};

use crate::error::ScrapeError;

use super::SourceClient;

const PAGE_LIMIT: usize = 40;
const MAX_MENTIONS: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    statuses: Vec<Status>,
}

#[derive(Debug, Deserialize)]
struct Status {
    /// HTML-formatted status body.
    content: Option<String>,
    url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    account: Option<Account>,
    favourites_count: Option<i64>,
    replies_count: Option<i64>,
    reblogs_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Account {
    acct: Option<String>,
}

/// Search the microblog for each keyword and merge the results.
///
/// # Errors
///
/// Returns [`ScrapeError`] if a search request fails or the response cannot
/// be parsed. The orchestrator treats that as zero results for this source.
pub(crate) async fn fetch_microblog_mentions(
    client: &SourceClient,
    keywords: &[String],
) -> Result<Vec<RawMention>, ScrapeError> {
    let mut mentions = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for keyword in keywords {
        let query = utf8_percent_encode(keyword, NON_ALPHANUMERIC);
        let url = format!(
            "{}/api/v2/search?q={query}&type=statuses&limit={PAGE_LIMIT}",
            client.microblog_base
        );

        let response: SearchResponse = client.get_json(&url, "microblog search").await?;

        for status in response.statuses {
            let Some(mention) = to_mention(status) else {
                continue;
            };
            let key = mention.url.clone().unwrap_or_else(|| mention.text.clone());
            if seen_urls.insert(key) {
                mentions.push(mention);
            }
            if mentions.len() >= MAX_MENTIONS {
                return Ok(mentions);
            }
        }
    }

    Ok(mentions)
}

fn to_mention(status: Status) -> Option<RawMention> {
    let text = strip_html(&status.content.unwrap_or_default());
    if text.trim().is_empty() {
        return None;
    }

    Some(RawMention {
        text,
        author: status.account.and_then(|a| a.acct).filter(|a| !a.is_empty()),
        source: SourceKind::Microblog,
        url: status.url,
        posted_at: status.created_at,
        likes: status.favourites_count.unwrap_or(0),
        replies: status.replies_count.unwrap_or(0),
        reposts: status.reblogs_count.unwrap_or(0),
    })
}

/// Drop HTML tags from a status body, keeping text content. Block-level
/// closers become spaces so adjacent paragraphs don't fuse into one word.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
