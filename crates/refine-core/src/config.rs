//! Settings for the refinement agent
//!
//! Built once at start-up from environment variables (after loading a
//! `.env` file) and passed explicitly to every component that needs it.
//!
//! | Variable            | Default                      |
//! |---------------------|------------------------------|
//! | `USE_JIRA`          | `1`                          |
//! | `JIRA_BASE_URL`     | empty                        |
//! | `JIRA_EMAIL`        | empty                        |
//! | `JIRA_API_TOKEN`    | empty                        |
//! | `JIRA_PROJECT_KEY`  | empty                        |
//! | `JIRA_MAX_RESULTS`  | `50`                         |
//! | `LOCAL_FILE`        | `backlog.csv`                |
//! | `SLACK_WEBHOOK_URL` | empty                        |
//! | `OPENAI_API_KEY`    | empty                        |
//! | `OPENAI_MODEL`      | `gpt-3.5-turbo`              |
//! | `OPENAI_BASE_URL`   | `https://api.openai.com/v1`  |
//! | `HTTP_TIMEOUT_SECS` | `30`                         |

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::RefineError;

pub const DEFAULT_MAX_RESULTS: u32 = 50;
pub const DEFAULT_LOCAL_FILE: &str = "backlog.csv";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Fetch tickets from the tracker instead of the local file
    pub use_jira: bool,
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    pub max_results: u32,
    pub local_file: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    pub webhook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub jira: JiraConfig,
    pub slack: SlackConfig,
    pub openai: OpenAiConfig,
    pub http: HttpConfig,
}

impl Settings {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Result<Self, RefineError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(RefineError::ConfigError(format!("Failed to load .env: {}", e))),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RefineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            jira: JiraConfig {
                use_jira: text("USE_JIRA", "1") == "1",
                base_url: text("JIRA_BASE_URL", ""),
                email: text("JIRA_EMAIL", ""),
                api_token: text("JIRA_API_TOKEN", ""),
                project_key: text("JIRA_PROJECT_KEY", ""),
                max_results: parse_number(&lookup, "JIRA_MAX_RESULTS", DEFAULT_MAX_RESULTS)?,
                local_file: text("LOCAL_FILE", DEFAULT_LOCAL_FILE),
            },
            slack: SlackConfig {
                webhook_url: text("SLACK_WEBHOOK_URL", ""),
            },
            openai: OpenAiConfig {
                api_key: text("OPENAI_API_KEY", ""),
                model: text("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                base_url: text("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            },
            http: HttpConfig {
                timeout_secs: parse_number(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
        })
    }

    /// Reject settings that cannot produce a run
    pub fn validate(&self) -> Result<(), RefineError> {
        if self.jira.use_jira {
            if self.jira.project_key.trim().is_empty() {
                return Err(RefineError::ConfigError(
                    "JIRA_PROJECT_KEY is not set but tracker mode is selected".to_string(),
                ));
            }
            if self.jira.base_url.trim().is_empty() {
                return Err(RefineError::ConfigError(
                    "JIRA_BASE_URL is not set but tracker mode is selected".to_string(),
                ));
            }
        } else if self.jira.local_file.trim().is_empty() {
            return Err(RefineError::ConfigError("LOCAL_FILE is empty".to_string()));
        }

        if self.jira.max_results == 0 {
            return Err(RefineError::ConfigError("JIRA_MAX_RESULTS must be positive".to_string()));
        }
        if self.http.timeout_secs == 0 {
            return Err(RefineError::ConfigError("HTTP_TIMEOUT_SECS must be positive".to_string()));
        }

        Ok(())
    }
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Result<T, RefineError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| RefineError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e))),
        _ => Ok(default),
    }
}
