//! Jira search source
//!
//! Fetches unscheduled stories (no sprint) for one project, newest first,
//! and maps each issue to a [`Ticket`].

use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use refine_core::config::JiraConfig;
use refine_core::data_model::fields;
use refine_core::http::body_excerpt;
use refine_core::{RefineError, Ticket};

use crate::normalizer::normalize_description;
use crate::source::TicketSource;

/// Fields requested from the search endpoint
pub const SEARCH_FIELDS: [&str; 5] = ["summary", "description", "fixVersions", "components", "reporter"];

pub struct JiraSource {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
    project_key: String,
    max_results: u32,
}

impl JiraSource {
    pub fn new(client: Client, config: &JiraConfig) -> Result<Self, RefineError> {
        if config.project_key.trim().is_empty() {
            return Err(RefineError::ConfigError("JIRA_PROJECT_KEY is not set".to_string()));
        }
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            project_key: config.project_key.clone(),
            max_results: config.max_results,
        })
    }

    /// JQL selecting the refinement backlog
    pub fn jql(&self) -> String {
        format!(
            "project = {} AND issuetype = Story AND Sprint is EMPTY ORDER BY created DESC",
            self.project_key
        )
    }

    /// Request body for the search endpoint
    pub fn search_payload(&self) -> Value {
        json!({
            "jql": self.jql(),
            "maxResults": self.max_results,
            "fields": SEARCH_FIELDS,
            "fieldsByKeys": false,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/rest/api/3/search/jql", self.base_url)
    }
}

impl TicketSource for JiraSource {
    fn describe(&self) -> String {
        format!("jira:{}", self.project_key)
    }

    fn fetch(&self) -> Result<Vec<Ticket>, RefineError> {
        let response = self
            .client
            .post(self.search_url())
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .json(&self.search_payload())
            .send()
            .map_err(|e| RefineError::SourceError(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().unwrap_or_default();
            return Err(RefineError::SourceError(format!(
                "Failed to fetch issues: {} - {}",
                status,
                body_excerpt(&body)
            )));
        }

        let data: Value = response
            .json()
            .map_err(|e| RefineError::ParseError(format!("Search response is not JSON: {}", e)))?;

        Ok(tickets_from_search(&data))
    }
}

/// Map every issue of a search response
pub fn tickets_from_search(data: &Value) -> Vec<Ticket> {
    data.get("issues")
        .and_then(Value::as_array)
        .map(|issues| issues.iter().map(ticket_from_issue).collect())
        .unwrap_or_default()
}

/// Map one search hit to a ticket
pub fn ticket_from_issue(issue: &Value) -> Ticket {
    let fields_value = issue.get("fields").unwrap_or(&Value::Null);
    let text = |value: Option<&Value>| value.and_then(Value::as_str).unwrap_or("").to_string();

    let description = fields_value
        .get("description")
        .map(normalize_description)
        .unwrap_or_default();
    let reporter = fields_value.get("reporter").unwrap_or(&Value::Null);

    let mut raw = BTreeMap::new();
    raw.insert(fields::ID.to_string(), text(issue.get("key")));
    raw.insert(fields::SUMMARY.to_string(), text(fields_value.get("summary")));
    raw.insert(fields::DESCRIPTION.to_string(), description);
    raw.insert(fields::FIX_VERSIONS.to_string(), joined_names(fields_value.get("fixVersions")));
    raw.insert(fields::COMPONENTS.to_string(), joined_names(fields_value.get("components")));
    raw.insert(fields::REPORTER.to_string(), text(reporter.get("displayName")));
    raw.insert(fields::ACCOUNT_ID.to_string(), text(reporter.get("accountId")));

    Ticket::from_raw(raw, None)
}

/// `[{ "name": "1.0" }, { "name": "1.1" }]` → `"1.0, 1.1"`
fn joined_names(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}
