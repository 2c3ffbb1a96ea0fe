//! Semantic judge: summary clarity, description completeness and drafted
//! acceptance criteria.
//!
//! The judge never fails past its own boundary. Short input short-circuits
//! to a fixed "not flagged" verdict without a remote call, and any backend
//! failure degrades to "not flagged" with a fixed note.

use serde::{Deserialize, Serialize};

use refine_core::RefineError;

/// Summaries shorter than this (trimmed) are not sent to the backend
pub const MIN_SUMMARY_CHARS: usize = 5;

/// Descriptions shorter than this (trimmed) are not sent to the backend
pub const MIN_DESCRIPTION_CHARS: usize = 10;

pub const SHORT_SUMMARY_RATIONALE: &str = "Summary is too short to evaluate clearly.";
pub const SHORT_DESCRIPTION_RATIONALE: &str =
    "Description is too short to contain meaningful acceptance criteria.";
pub const JUDGE_FAILED_RATIONALE: &str = "Semantic evaluation failed; the check was skipped.";
pub const SUGGESTION_FAILED: &str = "(Suggestion failed due to a judge error)";

const VAGUE_TERMS: [&str; 3] = ["vague", "unclear", "misleading"];
const INCOMPLETE_TERMS: [&str; 5] = ["incomplete", "missing", "unclear", "does not", "not present"];

const SUMMARY_PROMPT: &str = "You review backlog stories before sprint planning. \
Decide whether the story summary below is clear, specific and actionable for an agile team. \
Answer in exactly this format:\n\n\
Classification: Vague or Clear\n\
Explanation: one or two sentences of reasoning";

const DESCRIPTION_PROMPT: &str = "You review backlog stories before sprint planning. \
Decide whether the story description below contains clear, testable acceptance criteria. \
Answer in exactly this format:\n\n\
Classification: Complete or Incomplete\n\
Explanation: one or two sentences of reasoning";

const SUGGESTION_PROMPT: &str = "You are a product owner refining a backlog story. \
From the summary and description below, write clear, specific and testable acceptance criteria. \
Start with the heading:\n\
Suggested Acceptance Criteria\n\n\
Then list the criteria as bullet points.";

/// Verdict of one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    /// The check found a problem (vague summary, incomplete description)
    pub flagged: bool,
    pub rationale: String,
    /// The backend failed and the verdict is the fixed fallback
    pub degraded: bool,
}

impl Judgement {
    pub fn flagged(rationale: impl Into<String>) -> Self {
        Self { flagged: true, rationale: rationale.into(), degraded: false }
    }

    pub fn clear(rationale: impl Into<String>) -> Self {
        Self { flagged: false, rationale: rationale.into(), degraded: false }
    }

    pub fn failed() -> Self {
        Self { flagged: false, rationale: JUDGE_FAILED_RATIONALE.to_string(), degraded: true }
    }
}

/// Text classification and drafting capability used by the rules
pub trait Judge {
    /// Flagged when the summary is vague
    fn classify_summary(&self, summary: &str) -> Judgement;

    /// Flagged when the description lacks valid acceptance criteria
    fn classify_description(&self, description: &str) -> Judgement;

    /// Draft acceptance criteria for a story
    fn draft_acceptance_criteria(&self, summary: &str, description: &str) -> String;
}

impl<J: Judge + ?Sized> Judge for &J {
    fn classify_summary(&self, summary: &str) -> Judgement {
        (**self).classify_summary(summary)
    }

    fn classify_description(&self, description: &str) -> Judgement {
        (**self).classify_description(description)
    }

    fn draft_acceptance_criteria(&self, summary: &str, description: &str) -> String {
        (**self).draft_acceptance_criteria(summary, description)
    }
}

/// One chat-style completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Remote text model behind the judge
pub trait CompletionBackend {
    fn complete(&self, request: &CompletionRequest) -> Result<String, RefineError>;
}

/// Judge backed by a text completion model
pub struct LlmJudge<B> {
    backend: B,
}

impl<B: CompletionBackend> LlmJudge<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn ask(&self, system: &str, user: String, max_tokens: u32, temperature: f32) -> Result<String, RefineError> {
        let content = self.backend.complete(&CompletionRequest {
            system: system.to_string(),
            user,
            max_tokens,
            temperature,
        })?;
        let content = content.trim();
        if content.is_empty() {
            return Err(RefineError::JudgeError("empty completion".to_string()));
        }
        Ok(content.to_string())
    }
}

impl<B: CompletionBackend> Judge for LlmJudge<B> {
    fn classify_summary(&self, summary: &str) -> Judgement {
        let summary = summary.trim();
        if summary.chars().count() < MIN_SUMMARY_CHARS {
            return Judgement::clear(SHORT_SUMMARY_RATIONALE);
        }

        match self.ask(SUMMARY_PROMPT, format!("Summary: {}", summary), 150, 0.0) {
            Ok(content) => {
                let flagged = label_matches(&content, &VAGUE_TERMS);
                Judgement { flagged, rationale: content, degraded: false }
            }
            Err(e) => {
                tracing::warn!("Summary evaluation failed: {}", e);
                Judgement::failed()
            }
        }
    }

    fn classify_description(&self, description: &str) -> Judgement {
        let description = description.trim();
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            return Judgement::clear(SHORT_DESCRIPTION_RATIONALE);
        }

        match self.ask(DESCRIPTION_PROMPT, format!("Description: {}", description), 100, 0.0) {
            Ok(content) => {
                let flagged = label_matches(&content, &INCOMPLETE_TERMS);
                Judgement { flagged, rationale: content, degraded: false }
            }
            Err(e) => {
                tracing::warn!("Description evaluation failed: {}", e);
                Judgement::failed()
            }
        }
    }

    fn draft_acceptance_criteria(&self, summary: &str, description: &str) -> String {
        if summary.trim().is_empty() && description.trim().is_empty() {
            return String::new();
        }

        let user = format!("Summary: {}\n\nDescription: {}", summary.trim(), description.trim());
        match self.ask(SUGGESTION_PROMPT, user, 200, 0.2) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Acceptance criteria drafting failed: {}", e);
                SUGGESTION_FAILED.to_string()
            }
        }
    }
}

/// Value of a `Classification:` line, ignoring markdown emphasis.
///
/// A bare `Classification:` line takes its value from the next non-blank
/// line. No usable value gives `None`.
fn classification_label(content: &str) -> Option<String> {
    let clean = |line: &str| {
        line.replace('*', "")
            .to_lowercase()
            .trim()
            .trim_matches(|c: char| c == '[' || c == ']')
            .trim()
            .to_string()
    };

    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        let line = line.replace('*', "").to_lowercase();
        if let Some(rest) = line.trim().strip_prefix("classification:") {
            let label = clean(rest);
            if !label.is_empty() {
                return Some(label);
            }
            return lines.map(clean).find(|next| !next.is_empty());
        }
    }
    None
}

/// Whether the model's answer carries one of `terms`.
///
/// The `Classification:` label decides when present; otherwise the whole
/// answer is scanned.
fn label_matches(content: &str, terms: &[&str]) -> bool {
    let haystack = classification_label(content).unwrap_or_else(|| content.to_lowercase());
    terms.iter().any(|term| haystack.contains(term))
}
