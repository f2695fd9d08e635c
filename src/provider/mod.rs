//! # Provider Abstraction Layer
//!
//! Trait and implementations for the text-generation collaborator used by
//! the AI-assist endpoints.
//!
//! - [`Provider`] - Core trait for executing prompts
//! - [`GeminiProvider`] - Production provider using the Gemini REST API
//! - [`MockProvider`] - Test provider with configurable responses
//!
//! Providers own their timeouts and return errors instead of hanging; the
//! registry never waits on them.
//!
//! ```rust
//! use event_registry::provider::{MockProvider, PromptRequest, Provider};
//!
//! # tokio_test_block(async {
//! let provider = MockProvider::with_responses(vec!["Olá".to_string()]);
//! let response = provider.generate(PromptRequest::new("Diga olá")).await.unwrap();
//! assert_eq!(response.content, "Olá");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

mod gemini;
mod mock;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::AssistConfig;

// ============================================================================
// PROVIDER TRAIT (ASYNC)
// ============================================================================

/// Core trait that all text-generation providers must implement
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider name (e.g., "gemini", "mock")
    fn name(&self) -> &str;

    /// Model the provider sends prompts to
    fn model(&self) -> &str;

    /// Execute a prompt and return the generated text
    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse>;
}

// ============================================================================
// REQUEST/RESPONSE TYPES
// ============================================================================

/// Request to execute a prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub prompt: String,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from a prompt execution
#[derive(Debug, Clone)]
pub struct PromptResponse {
    /// The generated content
    pub content: String,
}

impl PromptResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

// ============================================================================
// PROVIDER FACTORY
// ============================================================================

/// Build the configured provider, `None` when AI assist is disabled
pub fn create_provider(config: Option<&AssistConfig>) -> Result<Option<Arc<dyn Provider>>> {
    let Some(config) = config else {
        return Ok(None);
    };

    let provider = GeminiProvider::new(&config.api_key, &config.model)?;
    Ok(Some(Arc::new(provider)))
}
