//! Content API publishing
//!
//! Turns a (title, body) pair into a single create-post request.

mod client;
mod types;

pub use client::PublishClient;
pub use types::{PUBLISHED_STATUS, PublishOutcome, PublishRequest, Publisher};
