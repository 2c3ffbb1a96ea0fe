//! Ticket source contract
use refine_core::{RefineError, Ticket};

/// Where tickets come from.
///
/// Implementations return tickets in ingestion order with
/// `present_fields` already computed.
pub trait TicketSource {
    /// Human-readable origin for log lines (ex: "jira:DEV", "csv:backlog.csv")
    fn describe(&self) -> String;

    /// Fetch every ticket to evaluate in this run
    fn fetch(&self) -> Result<Vec<Ticket>, RefineError>;
}
