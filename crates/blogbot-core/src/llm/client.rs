//! Chat-completions HTTP client

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::*;

/// Completion API client used to draft posts
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl CompletionClient {
    /// Create a new completion client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a completion request and return the parsed response
    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!("Sending request to completion API: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Completion API error: {} - {}", status, body);
            return Err(Error::Other(format!("{}: {}", status, body)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            Error::Other(format!("Failed to parse response: {} - {}", e, body))
        })?;

        info!(
            "Completion API response: model={}, tokens={}",
            parsed.model,
            parsed.usage.as_ref().map(|u| u.completion_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }
}

#[async_trait]
impl DraftGenerator for CompletionClient {
    async fn generate(&self, prompt: &str) -> GenerationOutcome {
        let request = ChatCompletionRequest::single_prompt(&self.model, prompt);

        match self.complete(&request).await {
            Ok(response) => match response.first_text() {
                Some(text) => GenerationOutcome::Generated(text.to_string()),
                None => {
                    warn!("Completion API returned no content");
                    GenerationOutcome::Failed("empty response from completion API".to_string())
                }
            },
            Err(e) => GenerationOutcome::Failed(e.to_string()),
        }
    }
}
