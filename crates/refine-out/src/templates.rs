//! Message templates for run-level output.
//!
//! The per-ticket blocks are assembled line by line in [`crate::renderer`];
//! the text around them (aggregate chat message, empty-run message, tracker
//! lead-in) comes from a YAML templates file with Handlebars syntax:
//!
//! ```yaml
//! version: "1.0"
//! templates:
//!   chat_summary:
//!     description: ...
//!     template: "*Backlog Refinement Summary*\n..."
//! ```

use handlebars::Handlebars;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use refine_core::RefineError;

pub const CHAT_SUMMARY: &str = "chat_summary";
pub const CHAT_NO_ISSUES: &str = "chat_no_issues";
pub const TRACKER_LEAD_IN: &str = "tracker_lead_in";

const REQUIRED: [&str; 3] = [CHAT_SUMMARY, CHAT_NO_ISSUES, TRACKER_LEAD_IN];

/// Built-in templates
pub const DEFAULT_TEMPLATES: &str = r#"
version: "1.0"
templates:
  chat_summary:
    description: Chat message for a run with flagged tickets
    template: "*Backlog Refinement Summary*\nFlagged Stories: {{flagged}}\n\n{{{body}}}"
  chat_no_issues:
    description: Chat message for a run with nothing flagged
    template: "✅ No issues flagged in the backlog refinement run."
  tracker_lead_in:
    description: Text following the reporter mention in a tracker comment
    template: ", Please review the following issues identified during backlog refinement:"
"#;

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: HashMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub description: String,
    pub template: String,
}

impl TemplatesFile {
    /// Load templates from a YAML file
    pub fn load(path: &str) -> Result<Self, RefineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RefineError::TemplateError(format!("Failed to read templates file {}: {}", path, e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, RefineError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| RefineError::TemplateError(format!("Failed to parse templates YAML: {}", e)))
    }

    /// List all template names
    pub fn list_templates(&self) -> Vec<&str> {
        self.templates.keys().map(|s| s.as_str()).collect()
    }
}

/// Compiled run-level message templates
pub struct MessageTemplates {
    handlebars: Handlebars<'static>,
}

impl MessageTemplates {
    /// Compile a templates file; every required template must be present
    pub fn new(file: &TemplatesFile) -> Result<Self, RefineError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        // Plain-text targets: no HTML escaping
        handlebars.register_escape_fn(handlebars::no_escape);

        for name in REQUIRED {
            let template = file.templates.get(name).ok_or_else(|| {
                RefineError::TemplateError(format!("Missing required template '{}'", name))
            })?;
            handlebars
                .register_template_string(name, &template.template)
                .map_err(|e| RefineError::TemplateError(format!("Template '{}': {}", name, e)))?;
        }

        let templates = Self { handlebars };
        templates.check()?;
        Ok(templates)
    }

    /// Render every template once on sample data; strict-mode errors fail the load
    fn check(&self) -> Result<(), RefineError> {
        self.chat_summary(1, &["- SAMPLE-1".to_string()])?;
        self.chat_no_issues()?;
        self.tracker_lead_in()?;
        Ok(())
    }

    /// The built-in templates
    pub fn builtin() -> Result<Self, RefineError> {
        Self::new(&TemplatesFile::from_yaml(DEFAULT_TEMPLATES)?)
    }

    /// Aggregate chat message: title, flagged count, blocks separated by a blank line
    pub fn chat_summary(&self, flagged: usize, blocks: &[String]) -> Result<String, RefineError> {
        self.render(CHAT_SUMMARY, &json!({ "flagged": flagged, "body": blocks.join("\n\n") }))
    }

    pub fn chat_no_issues(&self) -> Result<String, RefineError> {
        self.render(CHAT_NO_ISSUES, &json!({}))
    }

    pub fn tracker_lead_in(&self) -> Result<String, RefineError> {
        self.render(TRACKER_LEAD_IN, &json!({}))
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, RefineError> {
        self.handlebars
            .render(name, data)
            .map_err(|e| RefineError::TemplateError(format!("Render error in '{}': {}", name, e)))
    }
}
