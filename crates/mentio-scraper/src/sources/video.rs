//! Video-platform comment adapter (Invidious-compatible API).
//!
//! Searches for videos matching the keywords, then pulls the comment thread
//! of the top results. A `target_url` skips the search step and reads one
//! video's comments directly.

use std::collections::HashSet;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use mentio_core::{RawMention, SourceKind};

use crate::error::ScrapeError;

use super::SourceClient;

/// Videos inspected per keyword search.
const VIDEOS_PER_KEYWORD: usize = 3;
const MAX_MENTIONS: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentsResponse {
    comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
struct Comment {
    content: Option<String>,
    author: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<i64>,
    #[serde(rename = "commentId")]
    comment_id: Option<String>,
}

/// Collect comments from videos matching the keywords, or from the single
/// `target_url` when given.
///
/// # Errors
///
/// Returns [`ScrapeError`] if a request fails or a response cannot be
/// parsed. The orchestrator treats that as zero results for this source.
pub(crate) async fn fetch_video_mentions(
    client: &SourceClient,
    keywords: &[String],
    target_url: Option<&str>,
) -> Result<Vec<RawMention>, ScrapeError> {
    let mut video_ids: Vec<String> = Vec::new();

    if let Some(url) = target_url {
        if let Some(id) = extract_video_id(url) {
            video_ids.push(id);
        } else {
            tracing::warn!(url, "target URL has no recognizable video id; skipping");
            return Ok(Vec::new());
        }
    } else {
        for keyword in keywords {
            let query = utf8_percent_encode(keyword, NON_ALPHANUMERIC);
            let url = format!(
                "{}/api/v1/search?q={query}&type=video",
                client.video_base
            );
            let results: Vec<SearchResult> = client.get_json(&url, "video search").await?;
            video_ids.extend(
                results
                    .into_iter()
                    .filter_map(|r| r.video_id)
                    .take(VIDEOS_PER_KEYWORD),
            );
        }
    }

    let mut mentions = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for video_id in &video_ids {
        let url = format!("{}/api/v1/comments/{video_id}", client.video_base);
        let response: CommentsResponse = client.get_json(&url, "video comments").await?;

        for comment in response.comments {
            let Some(mention) = to_mention(comment, video_id) else {
                continue;
            };
            let key = mention.url.clone().unwrap_or_else(|| mention.text.clone());
            if seen.insert(key) {
                mentions.push(mention);
            }
            if mentions.len() >= MAX_MENTIONS {
                return Ok(mentions);
            }
        }
    }

    Ok(mentions)
}

fn to_mention(comment: Comment, video_id: &str) -> Option<RawMention> {
    let text = comment.content.unwrap_or_default();
    if text.trim().is_empty() {
        return None;
    }

    let url = comment
        .comment_id
        .map(|id| format!("https://www.youtube.com/watch?v={video_id}&lc={id}"));

    Some(RawMention {
        text,
        author: comment.author.filter(|a| !a.is_empty()),
        source: SourceKind::Video,
        url,
        posted_at: None,
        likes: comment.like_count.unwrap_or(0),
        replies: 0,
        reposts: 0,
    })
}

/// Pull a video id out of a watch URL (`v=` query parameter or trailing path
/// segment).
fn extract_video_id(url: &str) -> Option<String> {
    if let Some(idx) = url.find("v=") {
        let rest = &url[idx + 2..];
        let id: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if !id.is_empty() {
            return Some(id);
        }
    }

    url.rsplit('/')
        .next()
        .filter(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .map(ToOwned::to_owned)
}
