//! Shared helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request};
use yume_presence::{BoxFuture, ImageLookup, ImageResolver, PresenceTranslator};

/// Lookup returning the same image for every page.
pub struct StaticLookup(pub Option<&'static str>);

impl ImageLookup for StaticLookup {
    fn find_image<'a>(&'a self, _page_url: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(async move { self.0.map(String::from) })
    }
}

pub fn translator(room_image: Option<&'static str>) -> PresenceTranslator {
    PresenceTranslator::new(ImageResolver::new(
        Arc::new(StaticLookup(room_image)),
        Duration::from_millis(100),
    ))
}

/// POST request as sent by the browser extension.
pub fn extension_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/receive_from_2kki")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
