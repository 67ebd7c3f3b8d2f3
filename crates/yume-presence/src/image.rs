//! Image selection with lookup, caching and placeholder fallback.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, warn};
use yume_core::catalog::PLACEHOLDER_IMAGE;
use yume_prefs::ImageSource;
use yume_telemetry::Metrics;

use crate::lookup::ImageLookup;

/// Default bound on a single room image lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Turns an image choice into a concrete URL.
///
/// Never fails: anything that cannot be resolved becomes the placeholder.
pub struct ImageResolver {
    lookup: Arc<dyn ImageLookup>,
    timeout: Duration,
    /// Successful page → image lookups. Failures are not cached.
    cache: DashMap<String, String>,
}

impl ImageResolver {
    pub fn new(lookup: Arc<dyn ImageLookup>, timeout: Duration) -> Self {
        Self {
            lookup,
            timeout,
            cache: DashMap::new(),
        }
    }

    /// Resolve `source` to an image URL.
    pub async fn resolve(
        &self,
        source: ImageSource,
        page_url: Option<&str>,
        badge_url: Option<&str>,
        custom_url: &str,
    ) -> String {
        match source {
            ImageSource::CurrentRoom => self.room_image(page_url).await,
            ImageSource::Badge => non_empty(badge_url).unwrap_or(PLACEHOLDER_IMAGE).to_string(),
            ImageSource::Custom => custom_url.to_string(),
        }
    }

    async fn room_image(&self, page_url: Option<&str>) -> String {
        let Some(page_url) = non_empty(page_url) else {
            return PLACEHOLDER_IMAGE.to_string();
        };

        if let Some(cached) = self.cache.get(page_url) {
            Metrics::image_lookup("cached");
            return cached.value().clone();
        }

        match tokio::time::timeout(self.timeout, self.lookup.find_image(page_url)).await {
            Ok(Some(url)) if !url.trim().is_empty() => {
                Metrics::image_lookup("hit");
                debug!(page = %page_url, image = %url, "Room image found");
                self.cache.insert(page_url.to_string(), url.clone());
                url
            }
            Ok(_) => {
                Metrics::image_lookup("miss");
                debug!(page = %page_url, "No room image, using placeholder");
                PLACEHOLDER_IMAGE.to_string()
            }
            Err(_) => {
                Metrics::image_lookup("timeout");
                warn!(
                    page = %page_url,
                    timeout = ?self.timeout,
                    "Room image lookup timed out"
                );
                PLACEHOLDER_IMAGE.to_string()
            }
        }
    }

    /// Number of cached lookups.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
