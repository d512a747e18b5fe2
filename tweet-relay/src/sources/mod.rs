pub mod listing;
pub mod nitter;
pub mod syndication;

pub use listing::ListingSource;
pub use nitter::NitterSource;
pub use syndication::SyndicationSource;

use crate::parser::SourceFormat;
use crate::traits::{HttpClient, PostSource};
use std::sync::Arc;

/// Placeholder substituted with the account handle in configured source URLs.
pub const HANDLE_PLACEHOLDER: &str = "{handle}";

/// Builds the provider chain entries from configured URL templates, keeping their order.
pub fn from_templates(
    templates: &[String],
    handle: &str,
    client: Arc<dyn HttpClient>,
) -> Vec<Box<dyn PostSource>> {
    templates
        .iter()
        .map(|template| {
            let url = template.replace(HANDLE_PLACEHOLDER, handle);
            let format = SourceFormat::infer_from_url(&url);
            Box::new(ListingSource::new(url, format, client.clone())) as Box<dyn PostSource>
        })
        .collect()
}

/// The built-in chain: the structured JSON timeline first, then every Nitter mirror.
pub fn default_chain(handle: &str, client: Arc<dyn HttpClient>) -> Vec<Box<dyn PostSource>> {
    let mut sources: Vec<Box<dyn PostSource>> =
        vec![Box::new(SyndicationSource::new(handle, client.clone()))];
    for mirror in NitterSource::mirrors(&nitter::DEFAULT_MIRRORS, handle, client) {
        sources.push(Box::new(mirror));
    }
    sources
}
