use crate::parser::parse_native_timestamp;
use crate::traits::{DetailResolver, HttpClient};
use crate::types::{PostId, RelayError, ResolvedPost, Result, VideoMedia};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_DETAIL_API: &str = "https://api.fxtwitter.com";

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    tweet: Option<StatusRecord>,
}

#[derive(Debug, Deserialize)]
struct StatusRecord {
    #[serde(default)]
    text: String,
    created_at: Option<String>,
    #[serde(default)]
    author: Author,
    #[serde(default)]
    media: Media,
}

#[derive(Debug, Default, Deserialize)]
struct Author {
    name: Option<String>,
    screen_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Media {
    #[serde(default)]
    photos: Vec<Photo>,
    #[serde(default)]
    videos: Vec<Clip>,
    #[serde(default)]
    gifs: Vec<Clip>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Clip {
    #[serde(default)]
    url: String,
    thumbnail_url: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl Clip {
    fn is_gif(&self) -> bool {
        self.kind.as_deref() == Some("gif")
    }

    fn into_video(self) -> VideoMedia {
        VideoMedia {
            url: self.url,
            thumbnail_url: self.thumbnail_url,
        }
    }
}

impl Media {
    /// First real video wins; otherwise the first animated gif, wherever it was listed.
    fn primary_clip(&self) -> Option<Clip> {
        self.videos
            .iter()
            .find(|clip| !clip.is_gif())
            .or_else(|| self.gifs.first())
            .or_else(|| self.videos.iter().find(|clip| clip.is_gif()))
            .cloned()
    }
}

/// Resolves posts through an FxTwitter-compatible status API.
pub struct FxTwitterResolver {
    client: Arc<dyn HttpClient>,
    api_base: String,
    handle: String,
}

impl FxTwitterResolver {
    pub fn new(client: Arc<dyn HttpClient>, api_base: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            handle: handle.into(),
        }
    }

    pub fn status_url(&self, id: &PostId) -> String {
        format!("{}/{}/status/{}", self.api_base.trim_end_matches('/'), self.handle, id)
    }

    fn not_found(id: &PostId, reason: impl Into<String>) -> RelayError {
        RelayError::NotFound {
            id: id.clone(),
            reason: reason.into(),
        }
    }

    fn build_post(&self, id: &PostId, record: StatusRecord) -> ResolvedPost {
        let handle = record
            .author
            .screen_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.handle.clone());

        let clip = record.media.primary_clip();
        let images = record.media.photos.into_iter().filter_map(|photo| photo.url);

        let mut post = ResolvedPost::new(id.clone(), handle, record.text)
            .with_media(images, clip.map(Clip::into_video));
        if let Some(name) = record.author.name.filter(|name| !name.is_empty()) {
            post.author_display_name = name;
        }
        post.published_at = record.created_at.as_deref().and_then(parse_native_timestamp);
        post
    }
}

#[async_trait]
impl DetailResolver for FxTwitterResolver {
    async fn resolve(&self, id: &PostId) -> Result<ResolvedPost> {
        let url = self.status_url(id);
        debug!("Resolving post {} via {}", id, url);

        let response = self
            .client
            .get(&url)
            .await
            .map_err(|e| Self::not_found(id, e.to_string()))?;

        if response.status != 200 {
            warn!("Detail lookup for {} returned HTTP {}", id, response.status);
            return Err(Self::not_found(id, format!("HTTP {}", response.status)));
        }

        let envelope: StatusEnvelope = serde_json::from_str(&response.body)
            .map_err(|e| Self::not_found(id, format!("unreadable body: {}", e)))?;
        let record = envelope
            .tweet
            .ok_or_else(|| Self::not_found(id, "no tweet in response"))?;

        let post = self.build_post(id, record);
        debug!(
            "Resolved {}: {} image(s), video: {}",
            id,
            post.images.len(),
            post.video_url.is_some()
        );
        Ok(post)
    }
}
