//! Source adapter clients.
//!
//! Each submodule speaks one external platform's JSON API and maps its
//! response shapes onto [`RawMention`]. Adapters share one [`SourceClient`]
//! so HTTP pooling, the user agent, and the per-request timeout are
//! configured in a single place.

mod forum;
mod microblog;
mod video;

use std::time::Duration;

use crate::error::ScrapeError;

const DEFAULT_VIDEO_BASE: &str = "https://yewtu.be";
const DEFAULT_FORUM_BASE: &str = "https://www.reddit.com";
const DEFAULT_MICROBLOG_BASE: &str = "https://mastodon.social";

/// Shared HTTP client for all source adapters.
///
/// Base URLs default to the public endpoints and are overridable for tests
/// via [`SourceClient::with_bases`].
#[derive(Debug, Clone)]
pub struct SourceClient {
    pub(crate) http: reqwest::Client,
    pub(crate) video_base: String,
    pub(crate) forum_base: String,
    pub(crate) microblog_base: String,
    timeout_secs: u64,
}

impl SourceClient {
    /// Build a client with the given user agent and per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            video_base: DEFAULT_VIDEO_BASE.to_string(),
            forum_base: DEFAULT_FORUM_BASE.to_string(),
            microblog_base: DEFAULT_MICROBLOG_BASE.to_string(),
            timeout_secs,
        })
    }

    /// Override the adapter base URLs (used by tests against local mock
    /// servers).
    #[must_use]
    pub fn with_bases(
        mut self,
        video_base: impl Into<String>,
        forum_base: impl Into<String>,
        microblog_base: impl Into<String>,
    ) -> Self {
        self.video_base = video_base.into();
        self.forum_base = forum_base.into();
        self.microblog_base = microblog_base.into();
        self
    }

    /// The per-adapter time bound the orchestrator enforces.
    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, ScrapeError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScrapeError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

pub(crate) use forum::fetch_forum_mentions;
pub(crate) use microblog::fetch_microblog_mentions;
pub(crate) use video::fetch_video_mentions;
