//! Content API HTTP client

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use tracing::{debug, error, info, warn};

use crate::config::PublishConfig;
use crate::error::{Error, Result};

use super::types::{PublishOutcome, PublishRequest, Publisher};

/// Client for the create-post endpoint
#[derive(Clone)]
pub struct PublishClient {
    client: Client,
    api_url: String,
    api_token: String,
}

impl PublishClient {
    /// Create a new publish client
    pub fn new(config: &PublishConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl Publisher for PublishClient {
    async fn publish(&self, request: &PublishRequest) -> PublishOutcome {
        debug!("Publishing post '{}' to {}", request.slug, self.api_url);

        let response = match self
            .client
            .post(&self.api_url)
            .header(header::AUTHORIZATION, format!("Token {}", self.api_token))
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Publish request failed: {}", e);
                return PublishOutcome::TransportError(e.to_string());
            }
        };

        let status = response.status();
        if status == StatusCode::CREATED {
            info!("Post published: slug={}", request.slug);
            return PublishOutcome::Published;
        }

        match response.text().await {
            Ok(body) => {
                warn!("Content API rejected post: {} - {}", status, body);
                PublishOutcome::Rejected {
                    status: status.as_u16(),
                    body,
                }
            }
            Err(e) => {
                error!("Failed to read content API response: {}", e);
                PublishOutcome::TransportError(e.to_string())
            }
        }
    }
}
