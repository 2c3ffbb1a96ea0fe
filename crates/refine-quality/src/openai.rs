//! Chat-completions backend for the semantic judge
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use refine_core::config::OpenAiConfig;
use refine_core::http::body_excerpt;
use refine_core::RefineError;

use crate::judge::{CompletionBackend, CompletionRequest};

pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    pub fn new(client: Client, config: &OpenAiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Request body for one completion
    pub fn payload(&self, request: &CompletionRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }
}

impl CompletionBackend for OpenAiBackend {
    fn complete(&self, request: &CompletionRequest) -> Result<String, RefineError> {
        if self.api_key.trim().is_empty() {
            return Err(RefineError::JudgeError("OPENAI_API_KEY is not set".to_string()));
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.payload(request))
            .send()
            .map_err(|e| RefineError::JudgeError(format!("Completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RefineError::JudgeError(format!(
                "Completion returned HTTP {}: {}",
                status,
                body_excerpt(&body)
            )));
        }

        let body = response
            .text()
            .map_err(|e| RefineError::JudgeError(format!("Failed to read completion: {}", e)))?;
        parse_completion(&body)
    }
}

/// Extract the first choice's message text
pub fn parse_completion(body: &str) -> Result<String, RefineError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| RefineError::ParseError(format!("Malformed completion response: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| RefineError::ParseError("Completion response has no content".to_string()))
}
