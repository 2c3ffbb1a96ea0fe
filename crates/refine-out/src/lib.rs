//! Refine Out: reports for flagged tickets
//!
//! Turns an [`Evaluation`](refine_core::Evaluation) into the two report
//! renderings (tracker comment and chat block) and delivers them through
//! the tracker and chat sinks.
//!
//! # Example
//!
//! ```ignore
//! use refine_out::{render_ticket, MessageTemplates};
//!
//! let report = render_ticket(&ticket, &evaluation);
//! tracker.post_comment(&ticket.id, &report.tracker.lines, ticket.mention().as_ref())?;
//!
//! let templates = MessageTemplates::builtin()?;
//! chat.post_message(&templates.chat_summary(1, &[report.chat.text()])?)?;
//! ```

pub mod jira_comment;
pub mod renderer;
pub mod sinks;
pub mod slack;
pub mod templates;

pub use jira_comment::{comment_body, JiraCommentSink};
pub use renderer::{
    render, render_ticket, resolve_explanation, suggestion_lines, Rendering, ReportBlock, TicketReport,
};
pub use sinks::{ChatSink, StdoutSink, TrackerSink};
pub use slack::SlackWebhookSink;
pub use templates::{MessageTemplates, TemplatesFile, DEFAULT_TEMPLATES};

use refine_core::RefineError;

/// Templates from `path`, or the built-in set when no path is given
pub fn load_templates(path: Option<&str>) -> Result<MessageTemplates, RefineError> {
    match path {
        Some(path) => MessageTemplates::new(&TemplatesFile::load(path)?),
        None => MessageTemplates::builtin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_templates() {
        let templates = load_templates(None).unwrap();
        assert!(templates.chat_no_issues().unwrap().starts_with("✅"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_templates(Some("/nonexistent/templates.yaml")).err().unwrap();
        assert!(matches!(err, RefineError::TemplateError(_)));
    }
}
