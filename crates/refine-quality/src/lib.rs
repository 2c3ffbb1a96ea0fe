//! Refine Quality: ticket refinement rules
//!
//! This crate decides which quality issues apply to a backlog ticket and
//! why, consulting a semantic judge for the checks that need language
//! understanding.
//!
//! # Example
//!
//! ```ignore
//! use refine_quality::{evaluate, LlmJudge, OpenAiBackend};
//!
//! let judge = LlmJudge::new(OpenAiBackend::new(client, &settings.openai));
//! let evaluation = evaluate(&ticket, &judge);
//! for issue in &evaluation.issues {
//!     println!("{}", issue);
//! }
//! ```

pub mod component;
pub mod engine;
pub mod judge;
pub mod openai;

pub use component::{apply_component_override, missing_component_note, MISSING_COMPONENT_KEY};
pub use engine::{RuleEngine, DESCRIPTION_KEY, SUMMARY_KEY};
pub use judge::{CompletionBackend, CompletionRequest, Judge, Judgement, LlmJudge};
pub use openai::OpenAiBackend;

use refine_core::{Evaluation, Ticket};

/// Rules plus the component override, as the run applies them
pub fn evaluate<J: Judge>(ticket: &Ticket, judge: J) -> Evaluation {
    let mut evaluation = RuleEngine::new(judge).evaluate(ticket);
    apply_component_override(ticket, &mut evaluation);
    evaluation
}
