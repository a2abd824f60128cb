//! Publish request and outcome types

use async_trait::async_trait;
use serde::Serialize;

use crate::text::slugify;

/// Status code the content API uses for published posts
pub const PUBLISHED_STATUS: &str = "PB";

/// JSON body of a create-post request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishRequest {
    pub title: String,
    pub body: String,
    pub status: &'static str,
    pub slug: String,
}

impl PublishRequest {
    /// Build a published-post request, deriving the slug from the title
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let slug = slugify(&title);
        Self {
            title,
            body: body.into(),
            status: PUBLISHED_STATUS,
            slug,
        }
    }
}

/// Result of a single publish attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The API answered 201 Created
    Published,
    /// The API answered with any other status
    Rejected { status: u16, body: String },
    /// The request never produced a response
    TransportError(String),
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

/// Anything that can publish a post
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a post; never retried, never panics on API failure
    async fn publish(&self, request: &PublishRequest) -> PublishOutcome;
}
