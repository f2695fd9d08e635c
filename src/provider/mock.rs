//! Mock provider for testing
//!
//! Returns configurable responses without making real API calls.

use super::{PromptRequest, PromptResponse, Provider};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Mock provider that returns predefined responses
pub struct MockProvider {
    /// Queue of responses to return (FIFO)
    responses: Arc<Mutex<VecDeque<String>>>,
    /// Default response when queue is empty
    default_response: String,
    /// When set, every call fails with this message
    failure: Option<String>,
    /// Track all requests made (for assertions)
    requests: Arc<Mutex<Vec<PromptRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::default(),
            default_response: "Mock response".to_string(),
            failure: None,
            requests: Arc::default(),
        }
    }

    /// Create with a queue of responses
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..Self::new()
        }
    }

    /// Provider whose calls always fail
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Set the default response when queue is empty
    pub fn with_default(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Get all requests made to this provider
    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().clone()
    }

    /// Get the last request made
    pub fn last_request(&self) -> Option<PromptRequest> {
        self.requests.lock().last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse> {
        self.requests.lock().push(request);

        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }

        let text = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone());

        Ok(PromptResponse::new(text))
    }
}
