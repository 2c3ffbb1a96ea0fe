//! Refine Core: ticket model, configuration and errors
//!
//! Shared vocabulary for the backlog refinement crates: what a ticket is,
//! which issues can be raised against it, how explanations are shaped, and
//! how the run is configured.

pub mod config;
pub mod context;
pub mod data_model;
pub mod error;
pub mod http;
pub mod presence;

pub use config::Settings;
pub use context::RunContext;
pub use data_model::{Evaluation, Explanation, ExplanationMap, IssueTag, Mention, Ticket};
pub use error::RefineError;
