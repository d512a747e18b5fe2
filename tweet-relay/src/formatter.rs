use crate::types::{profile_url, ResolvedPost, Result};
use serde::{Deserialize, Serialize};

/// Discord rejects descriptions longer than this.
pub const MAX_DESCRIPTION_CHARS: usize = 4096;
/// Discord accepts at most this many embeds per webhook call.
pub const MAX_EMBEDS: usize = 10;
/// Images shown per post; the rest are dropped.
pub const MAX_IMAGES: usize = 4;

pub const TWITTER_BLUE: u32 = 1942002;
pub const TWITTER_ICON_URL: &str = "https://abs.twimg.com/icons/apple-touch-icon-192x192.png";
pub const EMPTY_TEXT_PLACEHOLDER: &str = "*(no text)*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
}

/// One webhook call: the primary embed plus one embed per extra image.
/// Extra embeds share the primary's url so Discord renders them as a gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryBatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

impl DeliveryBatch {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryFormatter {
    pub color: u32,
    pub footer_text: String,
    pub icon_url: String,
}

impl Default for DeliveryFormatter {
    fn default() -> Self {
        Self {
            color: TWITTER_BLUE,
            footer_text: "Twitter/X".to_string(),
            icon_url: TWITTER_ICON_URL.to_string(),
        }
    }
}

impl DeliveryFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(&self, post: &ResolvedPost, sequence_label: Option<&str>) -> DeliveryBatch {
        let footer_text = match sequence_label {
            Some(label) => format!("{} • {}", self.footer_text, label),
            None => self.footer_text.clone(),
        };

        let primary = Embed {
            title: Some(format!("New post from @{}", post.author_handle)),
            description: self.description(post),
            url: Some(post.canonical_url.clone()),
            color: Some(self.color),
            author: Some(EmbedAuthor {
                name: format!("{} (@{})", post.author_display_name, post.author_handle),
                url: Some(profile_url(&post.author_handle)),
                icon_url: Some(self.icon_url.clone()),
            }),
            footer: Some(EmbedFooter {
                text: footer_text,
                icon_url: Some(self.icon_url.clone()),
            }),
            timestamp: post.published_at.map(|ts| ts.to_rfc3339()),
            image: post.images.first().map(|url| EmbedImage { url: url.clone() }),
        };

        let mut embeds = vec![primary];
        embeds.extend(post.images.iter().skip(1).take(MAX_IMAGES - 1).map(|url| Embed {
            url: Some(post.canonical_url.clone()),
            image: Some(EmbedImage { url: url.clone() }),
            ..Embed::default()
        }));
        embeds.truncate(MAX_EMBEDS);

        DeliveryBatch {
            content: sequence_label
                .map(|label| format!("**{}** - @{} latest post:", label, post.author_handle)),
            embeds,
        }
    }

    fn description(&self, post: &ResolvedPost) -> Option<String> {
        let marker = post
            .video_url
            .as_ref()
            .map(|_| format!("\n\n🎬 **[Click to watch video]({})**", post.canonical_url));
        let blank = post.text.trim().is_empty();

        let marker = match marker {
            Some(marker) => marker,
            None if !blank => String::new(),
            None if post.images.is_empty() => return Some(EMPTY_TEXT_PLACEHOLDER.to_string()),
            None => return None,
        };
        if blank {
            return Some(marker.trim_start().to_string());
        }

        let budget = MAX_DESCRIPTION_CHARS.saturating_sub(marker.chars().count());
        let mut description = truncate_chars(&post.text, budget);
        description.push_str(&marker);
        Some(description)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
