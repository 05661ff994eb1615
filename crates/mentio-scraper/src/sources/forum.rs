//! Forum/social-board search adapter (Reddit-style listing API).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use mentio_core::{RawMention, SourceKind};

use crate::error::ScrapeError;

use super::SourceClient;

const PAGE_LIMIT: usize = 50;
const MAX_MENTIONS: usize = 100;

/// Search listing wrapper.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    selftext: Option<String>,
    author: Option<String>,
    permalink: Option<String>,
    created_utc: Option<f64>,
    ups: Option<i64>,
    num_comments: Option<i64>,
}

/// Search the forum for each keyword and merge the results.
///
/// # Errors
///
/// Returns [`ScrapeError`] if a search request fails or the response cannot
/// be parsed. The orchestrator treats that as zero results for this source.
pub(crate) async fn fetch_forum_mentions(
    client: &SourceClient,
    keywords: &[String],
) -> Result<Vec<RawMention>, ScrapeError> {
    let mut mentions = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for keyword in keywords {
        let query = utf8_percent_encode(keyword, NON_ALPHANUMERIC);
        let url = format!(
            "{}/search.json?q={query}&limit={PAGE_LIMIT}&sort=new",
            client.forum_base
        );

        let listing: Listing = client.get_json(&url, "forum search listing").await?;

        for post in listing.data.children {
            let Some(mention) = to_mention(post.data) else {
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

fn to_mention(post: PostData) -> Option<RawMention> {
    let title = post.title.unwrap_or_default();
    let body = post.selftext.unwrap_or_default();
    let text = match (title.trim(), body.trim()) {
        ("", "") => return None,
        (t, "") => t.to_string(),
        ("", b) => b.to_string(),
        (t, b) => format!("{t} {b}"),
    };

    let posted_at = post.created_utc.and_then(|secs| {
        #[allow(clippy::cast_possible_truncation)]
        let secs = secs as i64;
        DateTime::<Utc>::from_timestamp(secs, 0)
    });

    Some(RawMention {
        text,
        author: post.author.filter(|a| !a.is_empty()),
        source: SourceKind::Forum,
        url: post
            .permalink
            .map(|p| format!("https://www.reddit.com{p}")),
        posted_at,
        likes: post.ups.unwrap_or(0),
        replies: post.num_comments.unwrap_or(0),
        reposts: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, body: &str) -> PostData {
        PostData {
            title: Some(title.to_string()),
            selftext: Some(body.to_string()),
            author: Some("reviewer42".to_string()),
            permalink: Some("/r/gadgets/comments/abc".to_string()),
            created_utc: Some(1_722_470_400.0),
            ups: Some(12),
            num_comments: Some(3),
        }
    }

    #[test]
    fn to_mention_joins_title_and_body() {
        let mention = to_mention(post("Great battery", "lasts all day")).expect("mention");
        assert_eq!(mention.text, "Great battery lasts all day");
        assert_eq!(mention.source, SourceKind::Forum);
        assert_eq!(mention.likes, 12);
        assert_eq!(mention.replies, 3);
    }

    #[test]
    fn to_mention_drops_empty_posts() {
        assert!(to_mention(post("", "")).is_none());
        assert!(to_mention(post("  ", "  ")).is_none());
    }

    #[test]
    fn to_mention_builds_absolute_permalink() {
        let mention = to_mention(post("Title", "")).expect("mention");
        assert_eq!(
            mention.url.as_deref(),
            Some("https://www.reddit.com/r/gadgets/comments/abc")
        );
    }

    #[test]
    fn to_mention_parses_created_utc() {
        let mention = to_mention(post("Title", "")).expect("mention");
        assert!(mention.posted_at.is_some());
    }
}
