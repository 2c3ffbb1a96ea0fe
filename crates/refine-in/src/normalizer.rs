//! Description flattening for rich-text ticket bodies.
//!
//! Tracker descriptions arrive as a document tree: blocks (paragraphs,
//! headings, lists) holding inline text nodes. The evaluation rules work on
//! plain text, so the tree is flattened:
//! - every node contributes its own text, then its children in order
//! - each top-level block becomes one line
//! - each item of a top-level bullet list becomes its own `- item` line

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Node type of a top-level bullet list
pub const BULLET_LIST: &str = "bulletList";

/// One node of a rich-text document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextNode {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content: Option<Vec<RichTextNode>>,
}

impl RichTextNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: Some("text".to_string()),
            text: Some(text.into()),
            content: None,
        }
    }

    pub fn block(kind: impl Into<String>, content: Vec<RichTextNode>) -> Self {
        Self {
            kind: Some(kind.into()),
            text: None,
            content: Some(content),
        }
    }

    pub fn children(&self) -> &[RichTextNode] {
        self.content.as_deref().unwrap_or(&[])
    }

    pub fn is_bullet_list(&self) -> bool {
        self.kind.as_deref() == Some(BULLET_LIST)
    }

    /// Own text followed by the flattened text of every child
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in self.children() {
            child.flatten_into(out);
        }
    }
}

/// Flatten a document's top-level blocks into lines
pub fn flatten_document(doc: &RichTextNode) -> String {
    let mut lines = Vec::new();

    for block in doc.children() {
        if block.is_bullet_list() {
            for item in block.children() {
                let item_text = item.flatten();
                let item_text = item_text.trim();
                if !item_text.is_empty() {
                    lines.push(format!("- {}", item_text));
                }
            }
        } else {
            let block_text = block.flatten();
            if !block_text.trim().is_empty() {
                lines.push(block_text);
            }
        }
    }

    lines.join("\n").trim().to_string()
}

/// Normalize a raw description value as delivered by the tracker.
///
/// Plain strings are used as-is; anything that is not a document tree
/// normalizes to an empty description.
pub fn normalize_description(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        other => match RichTextNode::deserialize(other) {
            Ok(doc) => flatten_document(&doc),
            Err(e) => {
                tracing::warn!("Unreadable description document, treating as empty: {}", e);
                String::new()
            }
        },
    }
}
