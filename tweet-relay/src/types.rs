use chrono::{DateTime, Utc};
use std::fmt;

/// Identifiers with this many digits or fewer are treated as noise.
pub const MIN_POST_ID_LEN: usize = 6;

/// Numeric post identifier, stable across every provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(String);

impl PostId {
    /// Keeps only the digits of `raw` and rejects anything too short to be a real id.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < MIN_POST_ID_LEN {
            return None;
        }
        Some(Self(digits))
    }

    /// Derives the id from a status permalink such as
    /// `https://nitter.net/SoJ_Global/status/1790000000000000000#m`.
    pub fn from_permalink(link: &str) -> Option<Self> {
        let without_fragment = link.split('#').next().unwrap_or_default();
        let last_segment = without_fragment
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        Self::parse(last_segment)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cheap listing entry produced by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: PostId,
    pub published_at: Option<DateTime<Utc>>,
}

/// A video or animated gif attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMedia {
    pub url: String,
    pub thumbnail_url: Option<String>,
}

/// Fully enriched post, ready to be formatted for the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPost {
    pub id: PostId,
    pub author_display_name: String,
    pub author_handle: String,
    pub text: String,
    pub canonical_url: String,
    pub images: Vec<String>,
    pub video_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl ResolvedPost {
    pub fn new(id: PostId, author_handle: impl Into<String>, text: impl Into<String>) -> Self {
        let author_handle = author_handle.into();
        let canonical_url = canonical_status_url(&author_handle, &id);
        Self {
            id,
            author_display_name: author_handle.clone(),
            author_handle,
            text: text.into(),
            canonical_url,
            images: Vec::new(),
            video_url: None,
            published_at: None,
        }
    }

    /// Attaches media. Still images keep discovery order without duplicates;
    /// a video's thumbnail stands in as the image only when there are no stills.
    pub fn with_media<I, S>(mut self, images: I, video: Option<VideoMedia>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images.clear();
        for image in images {
            let image = image.into();
            if !image.is_empty() && !self.images.contains(&image) {
                self.images.push(image);
            }
        }

        self.video_url = None;
        if let Some(video) = video {
            if self.images.is_empty() {
                if let Some(thumb) = video.thumbnail_url.filter(|t| !t.is_empty()) {
                    self.images.push(thumb);
                }
            }
            if !video.url.is_empty() {
                self.video_url = Some(video.url);
            }
        }
        self
    }
}

pub fn canonical_status_url(handle: &str, id: &PostId) -> String {
    format!("https://twitter.com/{}/status/{}", handle, id)
}

pub fn profile_url(handle: &str) -> String {
    format!("https://twitter.com/{}", handle)
}

/// Raw HTTP exchange result, as seen by providers and the webhook sender.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            // Several mirrors block obvious bot user agents.
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            timeout_seconds: 15,
            max_retries: 0,
            retry_delay_seconds: 1,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Post not found: {id} ({reason})")]
    NotFound { id: PostId, reason: String },

    #[error("Webhook rejected payload with HTTP {status}: {body}")]
    Delivery { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_strips_non_digits() {
        let id = PostId::parse("id:1790000000000000000").unwrap();
        assert_eq!(id.as_str(), "1790000000000000000");
    }

    #[test]
    fn post_id_rejects_short_values() {
        assert!(PostId::parse("12345").is_none());
        assert!(PostId::parse("ab1c2d3e4f5").is_none());
        assert!(PostId::parse("").is_none());
        assert!(PostId::parse("123456").is_some());
    }

    #[test]
    fn permalink_uses_last_segment_without_fragment() {
        let id = PostId::from_permalink("https://nitter.net/User2024/status/1790000000000000001#m").unwrap();
        assert_eq!(id.as_str(), "1790000000000000001");

        let id = PostId::from_permalink("https://nitter.net/User2024/status/1790000000000000002/").unwrap();
        assert_eq!(id.as_str(), "1790000000000000002");

        assert!(PostId::from_permalink("https://nitter.net/User2024/about").is_none());
    }

    #[test]
    fn thumbnail_backfills_when_no_stills() {
        let id = PostId::parse("1111111111111").unwrap();
        let post = ResolvedPost::new(id, "someone", "clip").with_media(
            Vec::<String>::new(),
            Some(VideoMedia {
                url: "https://video.example/v.mp4".to_string(),
                thumbnail_url: Some("https://img.example/thumb.jpg".to_string()),
            }),
        );
        assert_eq!(post.images, vec!["https://img.example/thumb.jpg".to_string()]);
        assert_eq!(post.video_url.as_deref(), Some("https://video.example/v.mp4"));
    }

    #[test]
    fn thumbnail_ignored_when_stills_exist() {
        let id = PostId::parse("1111111111111").unwrap();
        let post = ResolvedPost::new(id, "someone", "mixed").with_media(
            vec!["https://img.example/a.jpg", "https://img.example/a.jpg", "https://img.example/b.jpg"],
            Some(VideoMedia {
                url: "https://video.example/v.mp4".to_string(),
                thumbnail_url: Some("https://img.example/thumb.jpg".to_string()),
            }),
        );
        assert_eq!(
            post.images,
            vec!["https://img.example/a.jpg".to_string(), "https://img.example/b.jpg".to_string()]
        );
    }

    #[test]
    fn canonical_url_points_at_status() {
        let id = PostId::parse("2222222222222").unwrap();
        let post = ResolvedPost::new(id, "SoJ_Global", "");
        assert_eq!(post.canonical_url, "https://twitter.com/SoJ_Global/status/2222222222222");
    }
}
