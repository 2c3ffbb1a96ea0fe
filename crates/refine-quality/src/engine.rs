//! Refinement rules for one ticket
//!
//! Rules run in a fixed order, which is also the order issues appear in
//! reports:
//! 1. summary clarity
//! 2. description / acceptance criteria completeness
//! 3. missing fix version
//! 4. missing component (reads the singular `component` field)
//!
//! Each rule runs only when its field is in the ticket's present fields.

use std::collections::BTreeSet;

use refine_core::data_model::{explanation_keys, fields};
use refine_core::{Evaluation, IssueTag, Ticket};

use crate::judge::Judge;

/// Explanation key for summary findings
pub const SUMMARY_KEY: &str = explanation_keys::SUMMARY;

/// Explanation key for description and acceptance criteria findings
pub const DESCRIPTION_KEY: &str = explanation_keys::DESCRIPTION;

pub const EMPTY_SUMMARY_EXPLANATION: &str = "Summary is empty or only whitespace.";
pub const EMPTY_DESCRIPTION_EXPLANATION: &str = "Description is empty or only whitespace.";

/// Applies the refinement rules using a semantic judge
pub struct RuleEngine<J> {
    judge: J,
}

impl<J: Judge> RuleEngine<J> {
    pub fn new(judge: J) -> Self {
        Self { judge }
    }

    /// Evaluate a ticket against its own present fields
    pub fn evaluate(&self, ticket: &Ticket) -> Evaluation {
        self.evaluate_gated(ticket, |field| ticket.is_present(field))
    }

    /// Evaluate a ticket with an explicit present-field set
    pub fn evaluate_fields(&self, ticket: &Ticket, present_fields: &BTreeSet<String>) -> Evaluation {
        self.evaluate_gated(ticket, |field| present_fields.contains(field))
    }

    fn evaluate_gated<G>(&self, ticket: &Ticket, is_present: G) -> Evaluation
    where
        G: Fn(&str) -> bool,
    {
        let mut evaluation = Evaluation::default();

        // === Summary ===
        if is_present(fields::SUMMARY) {
            self.check_summary(ticket, &mut evaluation);
        }

        // === Description / Acceptance Criteria ===
        if is_present(fields::DESCRIPTION) {
            self.check_description(ticket, &mut evaluation);
        }

        // === Fix Version ===
        if is_present(fields::FIX_VERSIONS) && ticket.fix_versions.trim().is_empty() {
            push_issue(&mut evaluation, IssueTag::MissingTargetVersion);
        }

        // === Component ===
        // Gated on `components` but reads `component`; sources never deliver
        // the singular field, so this only fires for files that carry it.
        if is_present(fields::COMPONENTS) {
            if let Some(component) = ticket.field(fields::COMPONENT) {
                if component.trim().is_empty() {
                    push_issue(&mut evaluation, IssueTag::MissingComponent);
                }
            }
        }

        tracing::debug!(
            ticket = %ticket.id,
            issues = evaluation.issues.len(),
            suggestion = evaluation.suggestion().is_some(),
            "Evaluated ticket"
        );

        evaluation
    }

    fn check_summary(&self, ticket: &Ticket, evaluation: &mut Evaluation) {
        if ticket.summary.trim().is_empty() {
            evaluation.explanations.insert_text(SUMMARY_KEY, EMPTY_SUMMARY_EXPLANATION);
            return;
        }

        let verdict = self.judge.classify_summary(&ticket.summary);
        if verdict.flagged {
            push_issue(evaluation, IssueTag::SummaryAnalysis);
            evaluation.explanations.insert_text(SUMMARY_KEY, verdict.rationale);
        } else if verdict.degraded {
            evaluation.explanations.insert_text(SUMMARY_KEY, verdict.rationale);
        }
    }

    fn check_description(&self, ticket: &Ticket, evaluation: &mut Evaluation) {
        if ticket.description.trim().is_empty() {
            push_issue(evaluation, IssueTag::DescriptionAnalysis);
            evaluation.explanations.insert_text(DESCRIPTION_KEY, EMPTY_DESCRIPTION_EXPLANATION);
            return;
        }

        let verdict = self.judge.classify_description(&ticket.description);
        if verdict.flagged {
            push_issue(evaluation, IssueTag::AcceptanceCriteriaAnalysis);
            evaluation.explanations.insert_text(DESCRIPTION_KEY, verdict.rationale);
            evaluation.suggestion =
                Some(self.judge.draft_acceptance_criteria(&ticket.summary, &ticket.description));
        } else if verdict.degraded {
            evaluation.explanations.insert_text(DESCRIPTION_KEY, verdict.rationale);
        }
    }
}

fn push_issue(evaluation: &mut Evaluation, tag: IssueTag) {
    if !evaluation.has_issue(tag) {
        evaluation.issues.push(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::{Judgement, JUDGE_FAILED_RATIONALE};
    use pretty_assertions::assert_eq;
    use refine_core::Explanation;
    use std::cell::Cell;

    /// Judge with fixed answers that counts its calls
    #[derive(Default)]
    struct FakeJudge {
        vague: bool,
        incomplete: bool,
        fail: bool,
        summary_calls: Cell<usize>,
        description_calls: Cell<usize>,
        draft_calls: Cell<usize>,
    }

    impl Judge for FakeJudge {
        fn classify_summary(&self, _summary: &str) -> Judgement {
            self.summary_calls.set(self.summary_calls.get() + 1);
            if self.fail {
                Judgement::failed()
            } else if self.vague {
                Judgement::flagged("Too generic to act on.")
            } else {
                Judgement::clear("Clear enough.")
            }
        }

        fn classify_description(&self, _description: &str) -> Judgement {
            self.description_calls.set(self.description_calls.get() + 1);
            if self.fail {
                Judgement::failed()
            } else if self.incomplete {
                Judgement::flagged("No acceptance criteria.")
            } else {
                Judgement::clear("Criteria present.")
            }
        }

        fn draft_acceptance_criteria(&self, _summary: &str, _description: &str) -> String {
            self.draft_calls.set(self.draft_calls.get() + 1);
            "Suggested Acceptance Criteria\n- Works".to_string()
        }
    }

    fn ticket(summary: &str, description: &str, fix_versions: &str, components: &str) -> Ticket {
        Ticket {
            id: "DEV-1".to_string(),
            summary: summary.to_string(),
            description: description.to_string(),
            fix_versions: fix_versions.to_string(),
            components: components.to_string(),
            present_fields: ["summary", "description", "fixVersions", "components"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..Ticket::default()
        }
    }

    #[test]
    fn test_blank_summary_records_explanation_only() {
        let judge = FakeJudge { vague: true, ..FakeJudge::default() };
        let engine = RuleEngine::new(&judge);

        let evaluation = engine.evaluate(&ticket("   ", "Body text here", "1.0", "Core"));

        assert!(!evaluation.has_issue(IssueTag::SummaryAnalysis));
        assert_eq!(judge.summary_calls.get(), 0);
        assert_eq!(
            evaluation.explanations.get(SUMMARY_KEY),
            Some(&Explanation::text(EMPTY_SUMMARY_EXPLANATION))
        );
    }

    #[test]
    fn test_vague_summary() {
        let judge = FakeJudge { vague: true, ..FakeJudge::default() };
        let engine = RuleEngine::new(&judge);

        let evaluation = engine.evaluate(&ticket("Fix stuff", "Body text here", "1.0", "Core"));

        assert_eq!(evaluation.issues, vec![IssueTag::SummaryAnalysis]);
        assert_eq!(
            evaluation.explanations.get(SUMMARY_KEY),
            Some(&Explanation::text("Too generic to act on."))
        );
    }

    #[test]
    fn test_incomplete_description_drafts_suggestion() {
        let judge = FakeJudge { incomplete: true, ..FakeJudge::default() };
        let engine = RuleEngine::new(&judge);

        let evaluation = engine.evaluate(&ticket("Export invoices", "Users want it", "1.0", "Core"));

        assert_eq!(evaluation.issues, vec![IssueTag::AcceptanceCriteriaAnalysis]);
        assert_eq!(
            evaluation.explanations.get(DESCRIPTION_KEY),
            Some(&Explanation::text("No acceptance criteria."))
        );
        assert!(evaluation.explanations.get("acceptance criteria analysis").is_none());
        assert!(evaluation.suggestion().is_some());
        assert_eq!(judge.draft_calls.get(), 1);
    }

    #[test]
    fn test_blank_or_complete_description_never_drafts() {
        let judge = FakeJudge { incomplete: true, ..FakeJudge::default() };
        let engine = RuleEngine::new(&judge);
        let evaluation = engine.evaluate(&ticket("Export invoices", " \n ", "1.0", "Core"));
        assert_eq!(evaluation.issues, vec![IssueTag::DescriptionAnalysis]);
        assert!(evaluation.suggestion.is_none());
        assert_eq!(judge.description_calls.get(), 0);

        let judge = FakeJudge::default();
        let engine = RuleEngine::new(&judge);
        let evaluation = engine.evaluate(&ticket("Export invoices", "Given/when/then", "1.0", "Core"));
        assert!(evaluation.issues.is_empty());
        assert!(evaluation.suggestion.is_none());
        assert_eq!(judge.draft_calls.get(), 0);
    }

    #[test]
    fn test_all_blank_ticket() {
        let judge = FakeJudge::default();
        let engine = RuleEngine::new(&judge);

        let evaluation = engine.evaluate(&ticket("", "", "", ""));

        assert_eq!(
            evaluation.issues,
            vec![IssueTag::DescriptionAnalysis, IssueTag::MissingTargetVersion]
        );
        assert!(evaluation.explanations.get("missing target version").is_none());
    }

    #[test]
    fn test_rules_are_gated_by_present_fields() {
        let judge = FakeJudge { vague: true, incomplete: true, ..FakeJudge::default() };
        let engine = RuleEngine::new(&judge);

        let evaluation = engine.evaluate_fields(&ticket("Fix", "", "", ""), &BTreeSet::new());

        assert!(evaluation.is_clean());
        assert_eq!(judge.summary_calls.get(), 0);
    }

    #[test]
    fn test_evaluate_uses_ticket_present_fields() {
        let judge = FakeJudge::default();
        let engine = RuleEngine::new(&judge);

        let mut t = ticket("Export invoices", "Given/when/then", "", "Core");
        t.present_fields.remove("fixVersions");
        assert!(engine.evaluate(&t).issues.is_empty());

        t.present_fields.insert("fixVersions".to_string());
        assert_eq!(engine.evaluate(&t).issues, vec![IssueTag::MissingTargetVersion]);
    }

    #[test]
    fn test_component_rule_reads_singular_field() {
        let judge = FakeJudge::default();
        let engine = RuleEngine::new(&judge);

        let mut t = ticket("Export invoices", "Given/when/then", "1.0", "");
        assert!(engine.evaluate(&t).issues.is_empty());

        t.extra.insert("component".to_string(), " ".to_string());
        assert_eq!(engine.evaluate(&t).issues, vec![IssueTag::MissingComponent]);
    }

    #[test]
    fn test_judge_failure_degrades_and_continues() {
        let judge = FakeJudge { fail: true, ..FakeJudge::default() };
        let engine = RuleEngine::new(&judge);

        let evaluation = engine.evaluate(&ticket("Export invoices", "Users want it", "", "Core"));

        assert_eq!(evaluation.issues, vec![IssueTag::MissingTargetVersion]);
        assert!(evaluation.suggestion.is_none());
        assert_eq!(
            evaluation.explanations.get(DESCRIPTION_KEY),
            Some(&Explanation::text(JUDGE_FAILED_RATIONALE))
        );
    }
}
