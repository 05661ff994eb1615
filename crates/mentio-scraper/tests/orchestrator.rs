//! Integration tests for the scrape orchestrator and source adapters.
//!
//! Uses `wiremock` to stand up one local HTTP server per source so no real
//! network traffic is made. The partial-failure and timeout tests pin down
//! the orchestrator's isolation guarantee: one broken source never fails a
//! scrape run.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mentio_core::SourceKind;
use mentio_scraper::{scrape_all, ScrapeRequest, SourceClient};

fn test_client(video: &MockServer, forum: &MockServer, microblog: &MockServer) -> SourceClient {
    SourceClient::new("mentio-test/0.1", 2)
        .expect("failed to build test SourceClient")
        .with_bases(video.uri(), forum.uri(), microblog.uri())
}

fn forum_listing(texts: &[&str]) -> serde_json::Value {
    let children: Vec<serde_json::Value> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            json!({
                "data": {
                    "title": text,
                    "selftext": "",
                    "author": "poster",
                    "permalink": format!("/r/gadgets/comments/{i}"),
                    "created_utc": 1_722_470_400.0,
                    "ups": 1,
                    "num_comments": 0
                }
            })
        })
        .collect();
    json!({"data": {"children": children}})
}

fn microblog_statuses(texts: &[&str]) -> serde_json::Value {
    let statuses: Vec<serde_json::Value> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            json!({
                "content": format!("<p>{text}</p>"),
                "url": format!("https://mb.example/@u/{i}"),
                "created_at": "2025-08-01T12:00:00Z",
                "account": {"acct": "user"},
                "favourites_count": 0,
                "replies_count": 0,
                "reblogs_count": 0
            })
        })
        .collect();
    json!({"statuses": statuses})
}

async fn mount_video(server: &MockServer, comments: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"videoId": "vid1"}])))
        .mount(server)
        .await;

    let comment_bodies: Vec<serde_json::Value> = comments
        .iter()
        .enumerate()
        .map(|(i, text)| {
            json!({
                "content": text,
                "author": "viewer",
                "likeCount": 0,
                "commentId": format!("c{i}")
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/comments/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"comments": comment_bodies})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scrape_all_merges_all_three_sources() {
    let video = MockServer::start().await;
    let forum = MockServer::start().await;
    let microblog = MockServer::start().await;

    mount_video(&video, &["Nice camera"]).await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forum_listing(&["Great battery"])))
        .mount(&forum)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(microblog_statuses(&["Solid build"])),
        )
        .mount(&microblog)
        .await;

    let client = test_client(&video, &forum, &microblog);
    let request = ScrapeRequest::all_sources(vec!["aurora buds".to_string()]);

    let batch = scrape_all(&client, &request).await;

    assert_eq!(batch.mentions.len(), 3, "one mention per source expected");
    assert_eq!(batch.total_scraped(), 3);
    assert_eq!(batch.per_source.len(), 3);
    assert!(batch.per_source.iter().all(|c| c.count == 1));
}

#[tokio::test]
async fn one_failing_source_contributes_zero_and_does_not_fail_the_run() {
    let video = MockServer::start().await;
    let forum = MockServer::start().await;
    let microblog = MockServer::start().await;

    // Video is down hard.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&video)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forum_listing(&["Great battery"])))
        .mount(&forum)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(microblog_statuses(&["Solid build"])),
        )
        .mount(&microblog)
        .await;

    let client = test_client(&video, &forum, &microblog);
    let request = ScrapeRequest::all_sources(vec!["aurora buds".to_string()]);

    let batch = scrape_all(&client, &request).await;

    let video_count = batch
        .per_source
        .iter()
        .find(|c| c.source == SourceKind::Video)
        .expect("video source must still be reported");
    assert_eq!(video_count.count, 0, "failing source reports zero");
    assert_eq!(batch.mentions.len(), 2, "other two sources still counted");
}

#[tokio::test]
async fn slow_source_times_out_without_blocking_the_others() {
    let video = MockServer::start().await;
    let forum = MockServer::start().await;
    let microblog = MockServer::start().await;

    // Forum answers after the 2s adapter timeout.
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forum_listing(&["too late"]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&forum)
        .await;
    mount_video(&video, &["Nice camera"]).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(microblog_statuses(&["Solid build"])),
        )
        .mount(&microblog)
        .await;

    let client = test_client(&video, &forum, &microblog);
    let request = ScrapeRequest::all_sources(vec!["aurora buds".to_string()]);

    let batch = scrape_all(&client, &request).await;

    let forum_count = batch
        .per_source
        .iter()
        .find(|c| c.source == SourceKind::Forum)
        .expect("forum source must still be reported");
    assert_eq!(forum_count.count, 0, "timed-out source reports zero");
    assert_eq!(batch.mentions.len(), 2);
}

#[tokio::test]
async fn cross_source_url_collisions_collapse_to_one_mention() {
    let video = MockServer::start().await;
    let forum = MockServer::start().await;
    let microblog = MockServer::start().await;

    // Both microblog statuses point at the same URL.
    let duplicated = json!({"statuses": [
        {
            "content": "<p>same link A</p>",
            "url": "https://mb.example/@u/dup",
            "account": {"acct": "user"},
            "favourites_count": 0, "replies_count": 0, "reblogs_count": 0
        },
        {
            "content": "<p>same link B</p>",
            "url": "https://mb.example/@u/dup",
            "account": {"acct": "user"},
            "favourites_count": 0, "replies_count": 0, "reblogs_count": 0
        }
    ]});
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(duplicated))
        .mount(&microblog)
        .await;

    let client = test_client(&video, &forum, &microblog);
    let request = ScrapeRequest {
        keywords: vec!["aurora buds".to_string()],
        target_url: None,
        video: false,
        forum: false,
        microblog: true,
    };

    let batch = scrape_all(&client, &request).await;
    assert_eq!(batch.mentions.len(), 1, "duplicate URL must collapse");
}
