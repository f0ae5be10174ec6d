//! Generation provider client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::models::{Content, GenerateContentRequest, GenerateContentResponse, ProviderErrorEnvelope};
use crate::config::GeminiConfig;
use crate::utils::{ApiError, ApiResult};

/// One synchronous generation call; the seam the dispatcher is tested through
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, contents: Vec<Content>) -> ApiResult<String>;

    /// Model identifier, for logs and the health endpoint
    fn model(&self) -> &str;
}

/// Google Gemini `generateContent` over HTTPS
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if config.request_timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout));
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            // Accept both "gemini-x" and the fully-qualified "models/gemini-x"
            model: config.model.trim().trim_start_matches("models/").to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, contents: Vec<Content>) -> ApiResult<String> {
        let request = GenerateContentRequest { contents };
        tracing::debug!(
            "Calling {} with {} content turns",
            self.model,
            request.contents.len()
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = ProviderErrorEnvelope::message_from_body(&body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ApiError::Auth { status: status.as_u16(), message }
                },
                _ => ApiError::upstream(status.as_u16(), message),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = parsed.into_text()?;
        tracing::debug!("{} replied with {} bytes", self.model, text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
