//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefineError {
    #[error("CONFIG/{0}")]
    ConfigError(String),

    #[error("SOURCE/{0}")]
    SourceError(String),

    #[error("PARSE/{0}")]
    ParseError(String),

    #[error("JUDGE/{0}")]
    JudgeError(String),

    #[error("SINK/{0}")]
    SinkError(String),

    #[error("TEMPLATE/{0}")]
    TemplateError(String),
}

impl RefineError {
    /// Whether the error must stop the run before any ticket is processed
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigError(_) | Self::SourceError(_))
    }
}
