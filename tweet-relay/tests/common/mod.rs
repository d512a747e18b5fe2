// Shared fakes and fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, Once};
use tweet_relay::{HttpClient, HttpResponse, RelayError, Result};

pub const HANDLE: &str = "SoJ_Global";
pub const WEBHOOK_URL: &str = "https://discord.example/api/webhooks/1/token";
pub const DETAIL_API: &str = "https://api.fxtwitter.example";

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    Refused,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Reply::Status(200, body.into())
    }
}

/// In-memory `HttpClient` answering from a per-URL script.
///
/// Each URL holds a queue of replies; the last one repeats forever.
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct ScriptedHttp {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, serde_json::Value)>>,
}

impl ScriptedHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: impl Into<String>, replies: Vec<Reply>) {
        self.routes.lock().unwrap().insert(url.into(), replies.into());
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, serde_json::Value)> {
        self.posts.lock().unwrap().clone()
    }

    fn answer(&self, url: &str) -> Result<HttpResponse> {
        let mut routes = self.routes.lock().unwrap();
        let reply = match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Reply::Status(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Reply::Refused) => Err(RelayError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            None => Ok(HttpResponse::new(404, "not found")),
        }
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.gets.lock().unwrap().push(url.to_string());
        self.answer(url)
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        self.posts.lock().unwrap().push((url.to_string(), body.clone()));
        self.answer(url)
    }
}

pub fn nitter_rss(ids: &[&str]) -> String {
    let items: String = ids
        .iter()
        .map(|id| {
            format!(
                "<item><title>post {id}</title><link>https://nitter.net/{HANDLE}/status/{id}#m</link>\
                 <guid>https://nitter.net/{HANDLE}/status/{id}#m</guid></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>{HANDLE}</title><link>https://nitter.net/{HANDLE}</link><description>feed</description>{items}</channel></rss>"#
    )
}

pub fn syndication_json(ids: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| serde_json::json!({ "tweet_id": id, "created_at": "Wed May 01 10:00:00 +0000 2024" }))
        .collect();
    serde_json::json!({ "timeline": entries }).to_string()
}

pub fn status_url(id: &str) -> String {
    format!("{DETAIL_API}/{HANDLE}/status/{id}")
}

/// FxTwitter-style status body.
pub fn fx_status(text: &str, media: serde_json::Value) -> String {
    serde_json::json!({
        "code": 200,
        "message": "OK",
        "tweet": {
            "text": text,
            "created_at": "Wed May 01 10:00:00 +0000 2024",
            "author": { "name": "Sword of Justice", "screen_name": HANDLE },
            "media": media,
        }
    })
    .to_string()
}

pub fn photos(count: usize) -> serde_json::Value {
    let photos: Vec<serde_json::Value> = (1..=count)
        .map(|i| serde_json::json!({ "type": "photo", "url": format!("https://pbs.example/{i}.jpg") }))
        .collect();
    serde_json::json!({ "photos": photos })
}
