//! Refinement Runner: evaluates each ticket and delivers the reports
//!
//! Tickets are processed one at a time in ingestion order. A flagged ticket
//! gets its tracker comment immediately; its chat block is held until the
//! end, where a single chat message goes out for the whole run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use refine_core::{RefineError, RunContext, Ticket};
use refine_out::{render_ticket, ChatSink, MessageTemplates, TrackerSink};
use refine_quality::Judge;

/// What happened during one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub tickets_seen: usize,
    pub flagged: usize,
    pub tracker_failures: usize,
    pub chat_posted: bool,
}

pub struct RefinementRunner<J, T, C> {
    judge: J,
    tracker: T,
    chat: C,
    templates: MessageTemplates,
}

impl<J, T, C> RefinementRunner<J, T, C>
where
    J: Judge,
    T: TrackerSink,
    C: ChatSink,
{
    pub fn new(judge: J, tracker: T, chat: C, templates: MessageTemplates) -> Self {
        Self {
            judge,
            tracker,
            chat,
            templates,
        }
    }

    /// Run over all tickets.
    ///
    /// Sink failures are logged and counted; they never stop the run.
    pub fn run(&self, ctx: &RunContext, tickets: &[Ticket]) -> Result<RunSummary, RefineError> {
        let span = tracing::info_span!("refinement_run", run_id = %ctx.run_id, dry_run = ctx.dry_run);
        let _guard = span.enter();

        let mut summary = RunSummary {
            run_id: ctx.run_id.clone(),
            started_at: ctx.started_at,
            tickets_seen: tickets.len(),
            flagged: 0,
            tracker_failures: 0,
            chat_posted: false,
        };
        let mut chat_blocks = Vec::new();

        for ticket in tickets {
            let evaluation = refine_quality::evaluate(ticket, &self.judge);
            if evaluation.is_clean() {
                tracing::debug!(ticket = %ticket.id, "Nothing flagged");
                continue;
            }

            summary.flagged += 1;
            tracing::info!(
                ticket = %ticket.id,
                flagged = summary.flagged,
                issues = ?evaluation.issues.iter().map(|tag| tag.as_str()).collect::<Vec<_>>(),
                "Ticket flagged"
            );

            let report = render_ticket(ticket, &evaluation);
            let mention = ticket.mention();
            if let Err(e) = self
                .tracker
                .post_comment(&ticket.id, &report.tracker.lines, mention.as_ref())
            {
                summary.tracker_failures += 1;
                tracing::warn!(ticket = %ticket.id, error = %e, "Tracker comment failed");
            }

            chat_blocks.push(report.chat.text());
        }

        let message = if chat_blocks.is_empty() {
            self.templates.chat_no_issues()?
        } else {
            self.templates.chat_summary(summary.flagged, &chat_blocks)?
        };

        match self.chat.post_message(&message) {
            Ok(()) => summary.chat_posted = true,
            Err(e) => tracing::warn!(error = %e, "Chat message failed"),
        }

        tracing::info!(
            tickets = summary.tickets_seen,
            flagged = summary.flagged,
            tracker_failures = summary.tracker_failures,
            chat_posted = summary.chat_posted,
            "Backlog refinement run complete"
        );

        Ok(summary)
    }
}
