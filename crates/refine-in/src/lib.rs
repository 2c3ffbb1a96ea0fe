//! Refine IN: ticket ingestion
//!
//! Turns tracker search results or a local CSV export into [`Ticket`]s
//! ready for evaluation: descriptions flattened to text, list fields
//! comma-joined, and `present_fields` computed.
//!
//! # Example
//!
//! ```ignore
//! use refine_in::{CsvSource, TicketSource};
//!
//! let source = CsvSource::new("backlog.csv");
//! for ticket in source.fetch()? {
//!     println!("{} | {}", ticket.id, ticket.summary);
//! }
//! ```
//!
//! [`Ticket`]: refine_core::Ticket

pub mod csv_source;
pub mod jira;
pub mod normalizer;
pub mod source;

pub use csv_source::CsvSource;
pub use jira::JiraSource;
pub use normalizer::{flatten_document, normalize_description, RichTextNode};
pub use source::TicketSource;
