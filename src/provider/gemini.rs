//! Gemini provider using the Generative Language REST API
//!
//! Executes prompts via `models/{model}:generateContent`.

use super::{PromptRequest, PromptResponse, Provider};
use crate::util::{CONNECT_TIMEOUT, INFER_TIMEOUT};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini API base URL
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(INFER_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("event-registry/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_URL.to_string(),
        })
    }

    /// Point the provider at another host (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse> {
        let generation_config = request.max_tokens.map(|max_output_tokens| GenerationConfig {
            max_output_tokens,
        });

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config,
        };

        tracing::debug!(
            provider = "gemini",
            model = %self.model,
            prompt_len = request.prompt.len(),
            max_tokens = ?request.max_tokens,
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(provider = "gemini", status = %status, error = %body, "Gemini API error");
            anyhow::bail!("Gemini API error {}: {}", status, body);
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        let content = api_response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .context("Gemini response contained no text")?;

        tracing::debug!(provider = "gemini", content_len = content.len(), "Gemini API response received");

        Ok(PromptResponse::new(content))
    }
}

// ============================================================================
// API TYPES
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
