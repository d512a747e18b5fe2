mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use tweet_relay::{DeliveryFormatter, DetailResolver, FxTwitterResolver, HttpClient, PostId, RelayError};

const ID: &str = "1790000000000000001";

fn resolver(http: &Arc<ScriptedHttp>) -> FxTwitterResolver {
    let client: Arc<dyn HttpClient> = http.clone();
    FxTwitterResolver::new(client, format!("{DETAIL_API}/"), HANDLE)
}

fn id() -> PostId {
    PostId::parse(ID).unwrap()
}

#[tokio::test]
async fn resolves_text_author_photos_and_timestamp() {
    init_tracing();
    let http = ScriptedHttp::new();
    http.route(status_url(ID), vec![Reply::ok(fx_status("hello", photos(2)))]);

    let post = resolver(&http).resolve(&id()).await.unwrap();

    assert_eq!(http.gets(), vec![status_url(ID)]);
    assert_eq!(post.text, "hello");
    assert_eq!(post.author_display_name, "Sword of Justice");
    assert_eq!(post.author_handle, HANDLE);
    assert_eq!(post.canonical_url, format!("https://twitter.com/{HANDLE}/status/{ID}"));
    assert_eq!(post.images, vec!["https://pbs.example/1.jpg", "https://pbs.example/2.jpg"]);
    assert!(post.video_url.is_none());
    assert_eq!(post.published_at.unwrap().to_rfc3339(), "2024-05-01T10:00:00+00:00");
}

#[tokio::test]
async fn video_thumbnail_becomes_the_only_image() {
    init_tracing();
    let http = ScriptedHttp::new();
    let media = json!({
        "videos": [
            { "type": "video", "url": "https://video.example/first.mp4", "thumbnail_url": "https://pbs.example/first.jpg" },
            { "type": "video", "url": "https://video.example/second.mp4", "thumbnail_url": "https://pbs.example/second.jpg" }
        ]
    });
    http.route(status_url(ID), vec![Reply::ok(fx_status("clip", media))]);

    let post = resolver(&http).resolve(&id()).await.unwrap();

    assert_eq!(post.images, vec!["https://pbs.example/first.jpg"]);
    assert_eq!(post.video_url.as_deref(), Some("https://video.example/first.mp4"));
}

#[tokio::test]
async fn stills_win_over_video_thumbnail() {
    init_tracing();
    let http = ScriptedHttp::new();
    let media = json!({
        "photos": [{ "url": "https://pbs.example/still.jpg" }, { "url": "https://pbs.example/still.jpg" }],
        "videos": [{ "url": "https://video.example/v.mp4", "thumbnail_url": "https://pbs.example/thumb.jpg" }]
    });
    http.route(status_url(ID), vec![Reply::ok(fx_status("mixed", media))]);

    let post = resolver(&http).resolve(&id()).await.unwrap();

    assert_eq!(post.images, vec!["https://pbs.example/still.jpg"]);
    assert_eq!(post.video_url.as_deref(), Some("https://video.example/v.mp4"));
}

#[tokio::test]
async fn gifs_are_treated_like_video() {
    init_tracing();
    let http = ScriptedHttp::new();
    let listed_separately = json!({
        "gifs": [{ "url": "https://video.example/loop.mp4", "thumbnail_url": "https://pbs.example/loop.jpg" }]
    });
    let listed_as_video = json!({
        "videos": [{ "type": "gif", "url": "https://video.example/loop2.mp4", "thumbnail_url": "https://pbs.example/loop2.jpg" }]
    });
    let other = "1790000000000000002";
    http.route(status_url(ID), vec![Reply::ok(fx_status("", listed_separately))]);
    http.route(status_url(other), vec![Reply::ok(fx_status("", listed_as_video))]);

    let resolver = resolver(&http);
    let first = resolver.resolve(&id()).await.unwrap();
    let second = resolver.resolve(&PostId::parse(other).unwrap()).await.unwrap();

    assert_eq!(first.video_url.as_deref(), Some("https://video.example/loop.mp4"));
    assert_eq!(first.images, vec!["https://pbs.example/loop.jpg"]);
    assert_eq!(second.video_url.as_deref(), Some("https://video.example/loop2.mp4"));
    assert_eq!(second.images, vec!["https://pbs.example/loop2.jpg"]);
}

#[tokio::test]
async fn unparsable_date_leaves_timestamp_empty() {
    init_tracing();
    let http = ScriptedHttp::new();
    let body = json!({ "tweet": { "text": "undated", "created_at": "sometime last week" } }).to_string();
    http.route(status_url(ID), vec![Reply::ok(body)]);

    let post = resolver(&http).resolve(&id()).await.unwrap();

    assert!(post.published_at.is_none());
    assert_eq!(post.author_display_name, HANDLE);
    assert!(post.images.is_empty());
}

#[tokio::test]
async fn failures_are_not_found() {
    init_tracing();
    let http = ScriptedHttp::new();
    let missing = "1790000000000000003";
    let refused = "1790000000000000004";
    let garbage = "1790000000000000005";
    http.route(status_url(ID), vec![Reply::Status(404, "{}".to_string())]);
    http.route(status_url(missing), vec![Reply::ok(r#"{"code":404,"message":"NOT_FOUND"}"#)]);
    http.route(status_url(refused), vec![Reply::Refused]);
    http.route(status_url(garbage), vec![Reply::ok("<html>")]);

    let resolver = resolver(&http);
    for raw in [ID, missing, refused, garbage] {
        let result = resolver.resolve(&PostId::parse(raw).unwrap()).await;
        assert!(
            matches!(result, Err(RelayError::NotFound { ref id, .. }) if id.as_str() == raw),
            "{} should be NotFound",
            raw
        );
    }
}

#[tokio::test]
async fn resolving_twice_formats_identically() {
    init_tracing();
    let http = ScriptedHttp::new();
    http.route(status_url(ID), vec![Reply::ok(fx_status("same every time", photos(3)))]);

    let resolver = resolver(&http);
    let formatter = DeliveryFormatter::new();
    let first = formatter.format(&resolver.resolve(&id()).await.unwrap(), None);
    let second = formatter.format(&resolver.resolve(&id()).await.unwrap(), None);

    assert_eq!(first, second);
    assert_eq!(first.embeds.len(), 3);
}
