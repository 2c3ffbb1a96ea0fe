//! Report assembly for a flagged ticket.
//!
//! Both renderings walk the same issue list through the same explanation
//! lookup and differ only in presentation:
//!
//! | Part        | Tracker comment                         | Chat block                   |
//! |-------------|-----------------------------------------|------------------------------|
//! | Header      | title, `- {id} (reported by {name})`, blank | `- {id} (reported by @{name})` |
//! | Suggestion  | heading + one bullet per line           | single pointer line          |

use serde::Serialize;

use refine_core::data_model::explanation_keys;
use refine_core::{Evaluation, Explanation, ExplanationMap, IssueTag, Ticket};

/// First line of every tracker comment
pub const TRACKER_TITLE: &str = "Backlog Refinement Summary";

pub const NO_EXPLANATION: &str = "(no explanation available)";

pub const SUGGESTION_HEADING: &str = "Suggested Acceptance Criteria:";

/// Chat stand-in for the suggestion, which only goes to the tracker
pub const SUGGESTION_POINTER: &str = "Acceptance criteria suggestion added in the tracker comment.";

const TAG_INDENT: &str = "  - ";
const DETAIL_INDENT: &str = "      ";
const SUGGESTION_INDENT: &str = "         ";

/// Which of the two renderings to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    Tracker,
    Chat,
}

/// Ordered lines for one ticket in one rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBlock {
    pub lines: Vec<String>,
}

impl ReportBlock {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Both renderings of one flagged ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketReport {
    pub tracker: ReportBlock,
    pub chat: ReportBlock,
}

pub fn render_ticket(ticket: &Ticket, evaluation: &Evaluation) -> TicketReport {
    TicketReport {
        tracker: render(Rendering::Tracker, ticket, evaluation),
        chat: render(Rendering::Chat, ticket, evaluation),
    }
}

pub fn render(rendering: Rendering, ticket: &Ticket, evaluation: &Evaluation) -> ReportBlock {
    let mut lines = header_lines(rendering, ticket);

    for (i, tag) in evaluation.issues.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(issue_lines(rendering, *tag, evaluation));
    }

    ReportBlock { lines }
}

fn header_lines(rendering: Rendering, ticket: &Ticket) -> Vec<String> {
    let reporter = ticket.reporter.trim();
    let mut first = format!("- {}", ticket.id);

    match rendering {
        Rendering::Tracker => {
            if !reporter.is_empty() {
                first.push_str(&format!(" (reported by {})", reporter));
            }
            vec![TRACKER_TITLE.to_string(), first, String::new()]
        }
        Rendering::Chat => {
            if !reporter.is_empty() {
                first.push_str(&format!(" (reported by @{})", reporter));
            }
            vec![first]
        }
    }
}

fn issue_lines(rendering: Rendering, tag: IssueTag, evaluation: &Evaluation) -> Vec<String> {
    let mut lines = vec![format!("{}{}", TAG_INDENT, tag)];

    match resolve_explanation(tag.as_str(), &evaluation.explanations) {
        Some(Explanation::Detail(pairs)) => {
            lines.extend(pairs.iter().map(|(k, v)| format!("{}{}: {}", DETAIL_INDENT, k, v)));
        }
        Some(Explanation::Text(text)) => {
            lines.extend(text.lines().map(|line| format!("{}{}", DETAIL_INDENT, line)));
        }
        None => lines.push(format!("{}{}", DETAIL_INDENT, NO_EXPLANATION)),
    }

    if is_acceptance(tag.as_str()) {
        if let Some(suggestion) = evaluation.suggestion() {
            match rendering {
                Rendering::Tracker => {
                    lines.push(format!("{}{}", DETAIL_INDENT, SUGGESTION_HEADING));
                    lines.extend(suggestion_lines(suggestion));
                }
                Rendering::Chat => lines.push(format!("{}{}", DETAIL_INDENT, SUGGESTION_POINTER)),
            }
        }
    }

    lines
}

/// Find the explanation for an issue label.
///
/// `summary*` reads the `summary` key, `acceptance*` reads `description`,
/// anything else tries the lowercased label and then the label itself.
/// Empty explanations count as unresolved.
pub fn resolve_explanation<'a>(tag: &str, explanations: &'a ExplanationMap) -> Option<&'a Explanation> {
    let lower = tag.to_lowercase();

    let found = if lower.starts_with("summary") {
        explanations.get(explanation_keys::SUMMARY)
    } else if is_acceptance(tag) {
        explanations.get(explanation_keys::DESCRIPTION)
    } else {
        explanations
            .get(&lower)
            .filter(|e| !e.is_empty())
            .or_else(|| explanations.get(tag))
    };

    found.filter(|e| !e.is_empty())
}

fn is_acceptance(tag: &str) -> bool {
    tag.to_lowercase().starts_with("acceptance")
}

/// Suggestion text as indented bullets, without any echoed heading
pub fn suggestion_lines(suggestion: &str) -> Vec<String> {
    suggestion
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.to_lowercase().starts_with("suggested acceptance criteria"))
        .map(|line| {
            if line.starts_with('-') {
                format!("{}{}", SUGGESTION_INDENT, line)
            } else {
                format!("{}- {}", SUGGESTION_INDENT, line)
            }
        })
        .collect()
}
