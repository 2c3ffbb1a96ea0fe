//! Data Model: Ticket, IssueTag, Explanation, Evaluation
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::presence;

/// Raw field names as they appear in ticket sources
pub mod fields {
    pub const ID: &str = "id";
    pub const KEY: &str = "key";
    pub const SUMMARY: &str = "summary";
    pub const DESCRIPTION: &str = "description";
    pub const FIX_VERSIONS: &str = "fixVersions";
    pub const COMPONENTS: &str = "components";
    /// Singular form read by the engine-level component rule
    pub const COMPONENT: &str = "component";
    pub const REPORTER: &str = "reporter";
    pub const ACCOUNT_ID: &str = "account_id";
    pub const PRESENT_FIELDS: &str = "present_fields";
}

/// Explanation keys written by the rules
pub mod explanation_keys {
    pub const SUMMARY: &str = "summary";
    /// Also holds the acceptance criteria rationale
    pub const DESCRIPTION: &str = "description";
}

/// Identifier used when a source row carries neither `id` nor `key`
pub const UNKNOWN_TICKET_ID: &str = "<unknown>";

/// A backlog work item under refinement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Tracker key (ex: "DEV-1234")
    pub id: String,
    pub summary: String,
    /// Flattened description text
    pub description: String,
    /// Comma-joined fix version names
    #[serde(rename = "fixVersions")]
    pub fix_versions: String,
    /// Comma-joined component names
    pub components: String,
    /// Reporter display name
    pub reporter: String,
    /// Opaque tracker account id used for @-mentions
    pub account_id: String,
    /// Fields considered non-empty, gating which rules run
    pub present_fields: BTreeSet<String>,
    /// Any other raw columns the source delivered
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Ticket {
    /// Build a ticket from a raw field map.
    ///
    /// When `present_fields` is `None` the set is computed from `raw` with
    /// the empty-sentinel rule.
    pub fn from_raw(
        mut raw: BTreeMap<String, String>,
        present_fields: Option<BTreeSet<String>>,
    ) -> Self {
        let present_fields = present_fields.unwrap_or_else(|| {
            presence::present_fields(raw.iter().map(|(k, v)| (k.as_str(), Some(v.as_str()))))
        });

        let mut take = |name: &str| raw.remove(name).unwrap_or_default();
        let id = take(fields::ID);
        let key = take(fields::KEY);
        let id = [id, key]
            .into_iter()
            .find(|v| !v.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TICKET_ID.to_string());

        Self {
            id,
            summary: take(fields::SUMMARY),
            description: take(fields::DESCRIPTION),
            fix_versions: take(fields::FIX_VERSIONS),
            components: take(fields::COMPONENTS),
            reporter: take(fields::REPORTER),
            account_id: take(fields::ACCOUNT_ID),
            present_fields,
            extra: raw,
        }
    }

    /// Text form of a field by its raw name, `None` when the ticket does not carry it
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            fields::ID => Some(&self.id),
            fields::SUMMARY => Some(&self.summary),
            fields::DESCRIPTION => Some(&self.description),
            fields::FIX_VERSIONS => Some(&self.fix_versions),
            fields::COMPONENTS => Some(&self.components),
            fields::REPORTER => Some(&self.reporter),
            fields::ACCOUNT_ID => Some(&self.account_id),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Whether a rule against `name` should run for this ticket
    pub fn is_present(&self, name: &str) -> bool {
        self.present_fields.contains(name)
    }

    /// Mention target for the tracker comment, if the reporter has an account id
    pub fn mention(&self) -> Option<Mention> {
        if self.account_id.trim().is_empty() {
            return None;
        }
        Some(Mention {
            display_name: self.reporter.clone(),
            account_id: self.account_id.clone(),
        })
    }
}

/// Reporter mention attached to a tracker comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub display_name: String,
    pub account_id: String,
}

/// Fixed vocabulary of quality problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueTag {
    #[serde(rename = "Summary Analysis")]
    SummaryAnalysis,
    #[serde(rename = "Description Analysis")]
    DescriptionAnalysis,
    #[serde(rename = "Acceptance Criteria Analysis")]
    AcceptanceCriteriaAnalysis,
    #[serde(rename = "Missing target version")]
    MissingTargetVersion,
    #[serde(rename = "Missing Component")]
    MissingComponent,
}

impl IssueTag {
    /// Label as it appears in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SummaryAnalysis => "Summary Analysis",
            Self::DescriptionAnalysis => "Description Analysis",
            Self::AcceptanceCriteriaAnalysis => "Acceptance Criteria Analysis",
            Self::MissingTargetVersion => "Missing target version",
            Self::MissingComponent => "Missing Component",
        }
    }
}

impl fmt::Display for IssueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rationale attached to an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Explanation {
    Text(String),
    Detail(BTreeMap<String, String>),
}

impl Explanation {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn detail<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Detail(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Empty explanations render as "no explanation available"
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Detail(map) => map.is_empty(),
        }
    }
}

/// Explanation key → explanation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExplanationMap(BTreeMap<String, Explanation>);

impl ExplanationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, explanation: Explanation) {
        self.0.insert(key.into(), explanation);
    }

    pub fn insert_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.insert(key, Explanation::text(text));
    }

    /// Insert only when the key is not already set
    pub fn set_default(&mut self, key: impl Into<String>, explanation: Explanation) {
        self.0.entry(key.into()).or_insert(explanation);
    }

    pub fn get(&self, key: &str) -> Option<&Explanation> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Explanation> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// Output of evaluating one ticket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Ordered issues; order drives report section order
    pub issues: Vec<IssueTag>,
    pub explanations: ExplanationMap,
    /// Drafted acceptance criteria
    pub suggestion: Option<String>,
}

impl Evaluation {
    pub fn has_issue(&self, tag: IssueTag) -> bool {
        self.issues.contains(&tag)
    }

    /// Suggestion text when one was drafted and is not blank
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Nothing to report: no issues and no suggestion
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.suggestion().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_from_raw_computes_present_fields() {
        let ticket = Ticket::from_raw(
            raw(&[("id", "DEV-1"), ("summary", "Add login"), ("description", ""), ("reporter", "nan")]),
            None,
        );

        assert_eq!(ticket.id, "DEV-1");
        assert!(ticket.is_present("summary"));
        assert!(ticket.is_present("id"));
        assert!(!ticket.is_present("description"));
        assert!(!ticket.is_present("reporter"));
    }

    #[test]
    fn test_from_raw_falls_back_to_key() {
        let ticket = Ticket::from_raw(raw(&[("id", ""), ("key", "DEV-9")]), None);
        assert_eq!(ticket.id, "DEV-9");

        let ticket = Ticket::from_raw(raw(&[("summary", "x")]), None);
        assert_eq!(ticket.id, UNKNOWN_TICKET_ID);
    }

    #[test]
    fn test_field_lookup_reads_extra_columns() {
        let ticket = Ticket::from_raw(raw(&[("id", "DEV-1"), ("component", " ")]), None);
        assert_eq!(ticket.field("component"), Some(" "));
        assert_eq!(ticket.field("components"), Some(""));
        assert_eq!(ticket.field("labels"), None);
    }

    #[test]
    fn test_mention_requires_account_id() {
        let mut ticket = Ticket {
            reporter: "Ada".to_string(),
            ..Ticket::default()
        };
        assert!(ticket.mention().is_none());

        ticket.account_id = "acc-1".to_string();
        let mention = ticket.mention().unwrap();
        assert_eq!(mention.display_name, "Ada");
        assert_eq!(mention.account_id, "acc-1");
    }

    #[test]
    fn test_issue_tag_labels() {
        assert_eq!(IssueTag::AcceptanceCriteriaAnalysis.to_string(), "Acceptance Criteria Analysis");
        assert_eq!(
            serde_json::to_string(&IssueTag::MissingTargetVersion).unwrap(),
            "\"Missing target version\""
        );
    }

    #[test]
    fn test_blank_suggestion_is_clean() {
        let evaluation = Evaluation {
            suggestion: Some("  ".to_string()),
            ..Evaluation::default()
        };
        assert!(evaluation.is_clean());
    }

    #[test]
    fn test_set_default_keeps_existing() {
        let mut map = ExplanationMap::new();
        map.insert_text("summary", "first");
        map.set_default("summary", Explanation::text("second"));
        assert_eq!(map.get("summary"), Some(&Explanation::text("first")));
    }
}
