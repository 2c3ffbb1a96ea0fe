//! Component override applied after the rules.
//!
//! Looks at the raw `components` text directly: blank means the ticket is
//! flagged with `Missing Component`, non-blank means any such flag is
//! withdrawn. The result replaces whatever the rules produced for that tag.

use refine_core::{Evaluation, Explanation, IssueTag, Ticket};

/// Explanation key for the injected note (the issue label itself)
pub const MISSING_COMPONENT_KEY: &str = "Missing Component";

/// Structured note explaining the missing component
pub fn missing_component_note() -> Explanation {
    Explanation::detail([
        ("Finding", "No component is set for this ticket."),
        ("Recommendation", "Assign an appropriate component for better traceability."),
    ])
}

/// Force `Missing Component` on or off from the raw `components` field
pub fn apply_component_override(ticket: &Ticket, evaluation: &mut Evaluation) {
    if ticket.components.trim().is_empty() {
        // A tag already raised by the rules keeps whatever explanation it has
        if !evaluation.has_issue(IssueTag::MissingComponent) {
            evaluation.issues.push(IssueTag::MissingComponent);
            evaluation
                .explanations
                .set_default(MISSING_COMPONENT_KEY, missing_component_note());
        }
    } else {
        evaluation.issues.retain(|tag| *tag != IssueTag::MissingComponent);
        evaluation.explanations.remove(MISSING_COMPONENT_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(components: &str) -> Ticket {
        Ticket {
            id: "DEV-1".to_string(),
            components: components.to_string(),
            ..Ticket::default()
        }
    }

    #[test]
    fn test_blank_components_adds_issue() {
        let mut evaluation = Evaluation {
            issues: vec![IssueTag::DescriptionAnalysis],
            ..Evaluation::default()
        };
        apply_component_override(&ticket("  "), &mut evaluation);

        assert_eq!(
            evaluation.issues,
            vec![IssueTag::DescriptionAnalysis, IssueTag::MissingComponent]
        );
        assert_eq!(
            evaluation.explanations.get(MISSING_COMPONENT_KEY),
            Some(&missing_component_note())
        );
    }

    #[test]
    fn test_override_is_idempotent() {
        let t = ticket("");
        let mut once = Evaluation::default();
        apply_component_override(&t, &mut once);
        let mut twice = once.clone();
        apply_component_override(&t, &mut twice);

        assert_eq!(once, twice);
        assert_eq!(twice.issues, vec![IssueTag::MissingComponent]);
    }

    #[test]
    fn test_present_components_removes_issue() {
        let mut evaluation = Evaluation {
            issues: vec![IssueTag::MissingComponent, IssueTag::MissingTargetVersion],
            ..Evaluation::default()
        };
        evaluation
            .explanations
            .insert(MISSING_COMPONENT_KEY, missing_component_note());

        let t = ticket("Payments");
        apply_component_override(&t, &mut evaluation);
        apply_component_override(&t, &mut evaluation);

        assert_eq!(evaluation.issues, vec![IssueTag::MissingTargetVersion]);
        assert!(!evaluation.explanations.contains_key(MISSING_COMPONENT_KEY));
    }

    #[test]
    fn test_existing_issue_keeps_position() {
        let mut evaluation = Evaluation {
            issues: vec![IssueTag::MissingComponent, IssueTag::MissingTargetVersion],
            ..Evaluation::default()
        };
        apply_component_override(&ticket(""), &mut evaluation);

        assert_eq!(
            evaluation.issues,
            vec![IssueTag::MissingComponent, IssueTag::MissingTargetVersion]
        );
        assert!(!evaluation.explanations.contains_key(MISSING_COMPONENT_KEY));
    }

    #[test]
    fn test_added_issue_keeps_existing_note() {
        let mut evaluation = Evaluation::default();
        evaluation.explanations.insert_text(MISSING_COMPONENT_KEY, "Set by hand.");
        apply_component_override(&ticket(""), &mut evaluation);

        assert_eq!(evaluation.issues, vec![IssueTag::MissingComponent]);
        assert_eq!(
            evaluation.explanations.get(MISSING_COMPONENT_KEY),
            Some(&Explanation::text("Set by hand."))
        );
    }
}
