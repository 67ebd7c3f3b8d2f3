//! Room image lookup on the location's wiki page.

use std::time::Duration;

use reqwest::{Client, Url};
use scraper::{Html, Selector};
use tracing::debug;

use crate::client::BoxFuture;
use crate::error::PresenceResult;

/// Finds an illustrative image for a wiki page.
///
/// Implementations never fail: any error is reported as "not found".
pub trait ImageLookup: Send + Sync {
    fn find_image<'a>(&'a self, page_url: &'a str) -> BoxFuture<'a, Option<String>>;
}

/// Selectors tried in order against the page.
const IMAGE_SELECTORS: &[&str] = &[
    "aside.portable-infobox img",
    ".infobox img",
    ".mw-parser-output figure img",
    ".mw-parser-output img",
];

/// [`ImageLookup`] fetching the page over HTTP and scraping it.
#[derive(Debug, Clone)]
pub struct WikiImageLookup {
    client: Client,
}

impl WikiImageLookup {
    /// Create a lookup whose requests give up after `timeout`.
    pub fn new(timeout: Duration, user_agent: &str) -> PresenceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch(&self, page_url: &str) -> PresenceResult<Option<String>> {
        let response = self.client.get(page_url).send().await?.error_for_status()?;
        let base = response.url().clone();
        let html = response.text().await?;
        Ok(extract_image(&html, &base))
    }
}

impl ImageLookup for WikiImageLookup {
    fn find_image<'a>(&'a self, page_url: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(async move {
            match self.fetch(page_url).await {
                Ok(found) => found,
                Err(e) => {
                    debug!(url = %page_url, error = %e, "Image lookup failed");
                    None
                }
            }
        })
    }
}

/// Pick the image of a page: `og:image` first, then the first matching
/// infobox or article image. Relative URLs are resolved against `base`.
pub fn extract_image(html: &str, base: &Url) -> Option<String> {
    let document = Html::parse_document(html);

    if let Some(content) = Selector::parse(r#"meta[property="og:image"]"#)
        .ok()
        .and_then(|s| {
            document
                .select(&s)
                .find_map(|el| el.value().attr("content").map(str::trim))
        })
        .filter(|c| !c.is_empty())
    {
        return absolutize(content, base);
    }

    for selector in IMAGE_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        for element in document.select(&selector) {
            let el = element.value();
            // Lazy-loaded images carry a data: stub in src and the real URL in data-src.
            let src = [el.attr("data-src"), el.attr("src")]
                .into_iter()
                .flatten()
                .map(str::trim)
                .find(|s| !s.is_empty() && !s.starts_with("data:"));
            if let Some(url) = src.and_then(|s| absolutize(s, base)) {
                return Some(url);
            }
        }
    }

    None
}

fn absolutize(src: &str, base: &Url) -> Option<String> {
    base.join(src)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://yume2kki.fandom.com/wiki/Nexus").unwrap()
    }

    #[test]
    fn test_prefers_og_image() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://static.example/nexus.png">
            </head><body><aside class="portable-infobox"><img src="/other.png"></aside></body></html>"#;
        assert_eq!(
            extract_image(html, &base()).as_deref(),
            Some("https://static.example/nexus.png")
        );
    }

    #[test]
    fn test_infobox_image_resolved_against_page() {
        let html = r#"<html><body>
            <aside class="portable-infobox"><img src="/images/nexus.png"></aside>
            </body></html>"#;
        assert_eq!(
            extract_image(html, &base()).as_deref(),
            Some("https://yume2kki.fandom.com/images/nexus.png")
        );
    }

    #[test]
    fn test_lazy_loaded_image_uses_data_src() {
        let html = r#"<html><body><div class="mw-parser-output">
            <img src="data:image/gif;base64,R0lGOD" data-src="//static.wikia.nocookie.net/a.png">
            </div></body></html>"#;
        assert_eq!(
            extract_image(html, &base()).as_deref(),
            Some("https://static.wikia.nocookie.net/a.png")
        );
    }

    #[test]
    fn test_page_without_images() {
        let html = "<html><body><p>No pictures here</p></body></html>";
        assert_eq!(extract_image(html, &base()), None);
    }

    #[tokio::test]
    async fn test_unreachable_page_is_not_found() {
        let lookup = WikiImageLookup::new(Duration::from_millis(500), "yume-rp-test").unwrap();
        assert_eq!(lookup.find_image("http://127.0.0.1:9/wiki/Nexus").await, None);
        assert_eq!(lookup.find_image("not a url").await, None);
    }
}
