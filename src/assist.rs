//! AI-assist operations
//!
//! Two prompts built from fields the caller passes explicitly; nothing is
//! read from or written to the registry.
//!
//! - [`suggest_ideas`]: objective + theme-with-verse suggestion, parsed as JSON
//! - [`social_caption`]: free-text social media caption

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Collaborator, RegistryError, Result};
use crate::provider::{PromptRequest, Provider};
use crate::util::constants::{CAPTION_MAX_TOKENS, IDEAS_MAX_TOKENS};

/// Markdown code fences models like to wrap JSON in
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json|JSON)?").unwrap());

/// Input of the ideas endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaRequest {
    #[serde(default)]
    pub evento: String,
    #[serde(default)]
    pub tipo: String,
}

/// Suggested objective and theme for an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaSuggestion {
    #[serde(default)]
    pub objetivo: String,
    #[serde(default)]
    pub tema_versiculo: String,
    #[serde(default)]
    pub descricao: String,
}

/// Input of the social caption endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionRequest {
    #[serde(default)]
    pub evento: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub objetivo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Caption {
    pub texto: String,
}

pub fn ideas_prompt(request: &IdeaRequest) -> String {
    format!(
        "Atue como estrategista cristão. Sugira OBJETIVO e TEMA COM VERSÍCULO para evento \"{}\": \"{}\". \
         Responda apenas com JSON: {{ \"objetivo\": \"...\", \"temaVersiculo\": \"...\", \"descricao\": \"...\" }}",
        request.tipo, request.evento
    )
}

pub fn caption_prompt(request: &CaptionRequest) -> String {
    format!(
        "Legenda Instagram para evento igreja \"{}\". Data: {}. Objetivo: {}. Use emojis.",
        request.evento, request.data, request.objetivo
    )
}

/// Remove code fences and anything outside the outermost JSON object
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parse the model's answer to the ideas prompt
pub fn parse_ideas(text: &str) -> Result<IdeaSuggestion> {
    let cleaned = CODE_FENCE.replace_all(text, "");
    serde_json::from_str(extract_json(&cleaned)).map_err(|e| {
        RegistryError::collaborator(
            Collaborator::Assist,
            format!("model returned invalid JSON: {}", e),
        )
    })
}

pub async fn suggest_ideas(provider: &dyn Provider, request: &IdeaRequest) -> Result<IdeaSuggestion> {
    tracing::debug!(provider = provider.name(), model = provider.model(), "requesting ideas");
    let prompt = PromptRequest::new(ideas_prompt(request)).with_max_tokens(IDEAS_MAX_TOKENS);
    let response = provider
        .generate(prompt)
        .await
        .map_err(|e| RegistryError::collaborator(Collaborator::Assist, format!("{:#}", e)))?;

    parse_ideas(&response.content)
}

pub async fn social_caption(provider: &dyn Provider, request: &CaptionRequest) -> Result<Caption> {
    tracing::debug!(provider = provider.name(), model = provider.model(), "requesting caption");
    let prompt = PromptRequest::new(caption_prompt(request)).with_max_tokens(CAPTION_MAX_TOKENS);
    let response = provider
        .generate(prompt)
        .await
        .map_err(|e| RegistryError::collaborator(Collaborator::Assist, format!("{:#}", e)))?;

    Ok(Caption {
        texto: response.content.trim().to_string(),
    })
}
