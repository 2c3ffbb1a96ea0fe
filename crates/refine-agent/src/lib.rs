//! Refine Agent: one backlog refinement run
//!
//! Wires the pieces together: settings and CLI overrides, the ticket
//! source, the semantic judge, and the tracker/chat sinks.
//!
//! # Run Flow
//!
//! ```text
//! Source → Ticket → Rules + Component override → Report → Tracker comment
//!                                                       ↘ Chat block → Chat message
//! ```

pub mod cli;
pub mod runner;

pub use cli::Cli;
pub use runner::{RefinementRunner, RunSummary};

use anyhow::Context;
use reqwest::blocking::Client;

use refine_core::{http, RefineError, RunContext, Settings, Ticket};
use refine_in::{CsvSource, JiraSource, TicketSource};
use refine_out::{ChatSink, JiraCommentSink, SlackWebhookSink, StdoutSink, TrackerSink};
use refine_quality::{LlmJudge, OpenAiBackend};

/// Ticket source selected by the settings
pub fn ticket_source(
    settings: &Settings,
    client: &Client,
) -> Result<Box<dyn TicketSource>, RefineError> {
    if settings.jira.use_jira {
        Ok(Box::new(JiraSource::new(client.clone(), &settings.jira)?))
    } else {
        Ok(Box::new(CsvSource::new(&settings.jira.local_file)))
    }
}

/// Log each fetched ticket as `id | summary`
pub fn list_tickets(tickets: &[Ticket]) {
    tracing::info!("Fetched {} tickets", tickets.len());
    for ticket in tickets {
        tracing::info!("{} | {}", ticket.id, ticket.summary);
    }
}

/// Execute a full run from the environment plus command-line overrides
pub fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let mut settings = Settings::from_env().context("Failed to read settings")?;
    cli.apply(&mut settings);
    settings.validate().context("Invalid settings")?;
    let templates = refine_out::load_templates(cli.templates.as_deref()).context("Invalid templates")?;

    let ctx = RunContext::new(cli.dry_run);
    let client = http::client(&settings.http)?;

    let source = ticket_source(&settings, &client)?;
    tracing::info!(source = %source.describe(), "Fetching tickets");
    let tickets = source
        .fetch()
        .with_context(|| format!("Failed to fetch tickets from {}", source.describe()))?;
    list_tickets(&tickets);

    let judge = LlmJudge::new(OpenAiBackend::new(client.clone(), &settings.openai));

    let (tracker, chat): (Box<dyn TrackerSink>, Box<dyn ChatSink>) = if ctx.dry_run {
        (Box::new(StdoutSink::stdout()), Box::new(StdoutSink::stdout()))
    } else {
        (
            Box::new(JiraCommentSink::new(
                client.clone(),
                &settings.jira,
                templates.tracker_lead_in()?,
            )),
            Box::new(SlackWebhookSink::new(client, &settings.slack)),
        )
    };

    let runner = RefinementRunner::new(judge, tracker.as_ref(), chat.as_ref(), templates);
    Ok(runner.run(&ctx, &tickets)?)
}
