//! Shared blocking HTTP client
use reqwest::blocking::Client;

use crate::config::HttpConfig;
use crate::error::RefineError;

/// Build the client used for every tracker, chat and judge call.
///
/// Every request made through it is bounded by the configured timeout.
pub fn client(config: &HttpConfig) -> Result<Client, RefineError> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!("backlog-refinement/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RefineError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}

/// Truncated response body for log lines
pub fn body_excerpt(body: &str) -> String {
    const MAX: usize = 500;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
