//! Jira comment sink
//!
//! Comments are Atlassian Document Format: an optional mention paragraph
//! followed by one paragraph per report line.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

use refine_core::config::JiraConfig;
use refine_core::http::body_excerpt;
use refine_core::{Mention, RefineError};

use crate::sinks::TrackerSink;

pub struct JiraCommentSink {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
    lead_in: String,
}

impl JiraCommentSink {
    /// `lead_in` follows the reporter mention in the first paragraph
    pub fn new(client: Client, config: &JiraConfig, lead_in: impl Into<String>) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            lead_in: lead_in.into(),
        }
    }

    fn comment_url(&self, ticket_id: &str) -> String {
        format!("{}/rest/api/3/issue/{}/comment", self.base_url, ticket_id)
    }
}

impl TrackerSink for JiraCommentSink {
    fn post_comment(
        &self,
        ticket_id: &str,
        lines: &[String],
        mention: Option<&Mention>,
    ) -> Result<(), RefineError> {
        let body = comment_body(lines, mention, &self.lead_in);
        tracing::debug!(ticket = %ticket_id, paragraphs = lines.len(), "Posting tracker comment");

        let response = self
            .client
            .post(self.comment_url(ticket_id))
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .map_err(|e| RefineError::SinkError(format!("Comment on {} failed: {}", ticket_id, e)))?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let text = response.text().unwrap_or_default();
            return Err(RefineError::SinkError(format!(
                "Comment on {} rejected: {} - {}",
                ticket_id,
                status,
                body_excerpt(&text)
            )));
        }

        tracing::info!(ticket = %ticket_id, "Comment posted to tracker");
        Ok(())
    }
}

/// Request body for the comment endpoint
pub fn comment_body(lines: &[String], mention: Option<&Mention>, lead_in: &str) -> Value {
    let mut content = Vec::with_capacity(lines.len() + 1);

    if let Some(mention) = mention.filter(|m| !m.account_id.trim().is_empty()) {
        let name = mention.display_name.trim();
        let label = if name.is_empty() {
            "@reporter".to_string()
        } else {
            format!("@{}", name)
        };
        content.push(json!({
            "type": "paragraph",
            "content": [
                { "type": "mention", "attrs": { "id": mention.account_id, "text": label } },
                { "type": "text", "text": lead_in },
            ]
        }));
    }

    for line in lines {
        // ADF rejects empty text nodes
        if line.is_empty() {
            content.push(json!({ "type": "paragraph", "content": [] }));
        } else {
            content.push(json!({
                "type": "paragraph",
                "content": [{ "type": "text", "text": line }]
            }));
        }
    }

    json!({
        "body": {
            "type": "doc",
            "version": 1,
            "content": content,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comment_body_with_mention() {
        let mention = Mention {
            display_name: "Ada".to_string(),
            account_id: "acc-1".to_string(),
        };
        let lines = vec!["Backlog Refinement Summary".to_string(), String::new()];

        let body = comment_body(&lines, Some(&mention), ", please review:");

        assert_eq!(
            body,
            json!({
                "body": {
                    "type": "doc",
                    "version": 1,
                    "content": [
                        {
                            "type": "paragraph",
                            "content": [
                                { "type": "mention", "attrs": { "id": "acc-1", "text": "@Ada" } },
                                { "type": "text", "text": ", please review:" }
                            ]
                        },
                        {
                            "type": "paragraph",
                            "content": [{ "type": "text", "text": "Backlog Refinement Summary" }]
                        },
                        { "type": "paragraph", "content": [] }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_mention_without_name() {
        let mention = Mention {
            display_name: String::new(),
            account_id: "acc-2".to_string(),
        };
        let body = comment_body(&[], Some(&mention), ", review");
        assert_eq!(body["body"]["content"][0]["content"][0]["attrs"]["text"], "@reporter");
    }

    #[test]
    fn test_no_mention_paragraph_without_account() {
        let body = comment_body(&["only".to_string()], None, ", review");
        let content = body["body"]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["content"][0]["text"], "only");
    }
}
