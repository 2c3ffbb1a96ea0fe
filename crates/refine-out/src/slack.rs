//! Slack incoming-webhook sink
use reqwest::blocking::Client;
use serde_json::json;

use refine_core::config::SlackConfig;
use refine_core::http::body_excerpt;
use refine_core::RefineError;

use crate::sinks::ChatSink;

pub struct SlackWebhookSink {
    client: Client,
    webhook_url: String,
}

impl SlackWebhookSink {
    pub fn new(client: Client, config: &SlackConfig) -> Self {
        Self {
            client,
            webhook_url: config.webhook_url.trim().to_string(),
        }
    }
}

impl ChatSink for SlackWebhookSink {
    fn post_message(&self, text: &str) -> Result<(), RefineError> {
        if self.webhook_url.is_empty() {
            return Err(RefineError::SinkError("SLACK_WEBHOOK_URL is not set".to_string()));
        }

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "text": text }))
            .send()
            .map_err(|e| RefineError::SinkError(format!("Chat webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RefineError::SinkError(format!(
                "Chat webhook rejected message: {} - {}",
                status,
                body_excerpt(&body)
            )));
        }

        tracing::info!("Chat message posted");
        Ok(())
    }
}
