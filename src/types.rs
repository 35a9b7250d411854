use serde::Serialize;
use serde_json::Value;

use crate::error::FailureKind;

/// One located object start: the byte offset of the opening brace plus the
/// captured key value. Anchors are produced in document order, strictly
/// increasing and non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorMatch {
    pub key: String,
    pub start: usize,
}

/// Half-open byte range in the repaired text believed to delimit one
/// complete object. Exactly one span attempt is made per anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectSpan {
    pub start: usize,
    pub end: usize,
}

impl ObjectSpan {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Per-anchor result. The recovered object itself is skipped when the
/// report is serialized; `context` is a bounded excerpt around the failure
/// offset, for diagnosis only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ParseOutcome {
    Parsed {
        key: String,
        #[serde(skip)]
        object: Value,
    },
    Failed {
        key: String,
        kind: FailureKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<String>,
    },
}

impl ParseOutcome {
    pub fn key(&self) -> &str {
        match self {
            ParseOutcome::Parsed { key, .. } | ParseOutcome::Failed { key, .. } => key,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed { .. })
    }
}

/// One applied textual fixup. `at` is the byte offset in the text the pass
/// ran over, not in the original document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairAction {
    pub op: String,
    pub at: usize,
}

impl RepairAction {
    pub fn new(op: &str, at: usize) -> Self {
        Self {
            op: op.to_string(),
            at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// First field of every exportable object; its value is the object's key.
    pub anchor_field: String,
    /// Fields whose integer values are known to grow a stray trailing quote
    /// in the export.
    pub numeric_fields: Vec<String>,
    /// Canonical key order for the recovered objects; keys absent from the
    /// list sort after all listed keys.
    pub key_order: Vec<String>,
    /// Field holding the nested item list. Used for diagnostics and stats,
    /// never for extraction decisions.
    pub items_field: String,
    /// Bytes of context kept on each side of a parse failure offset.
    pub context_chars: usize,
    /// Insert separator commas only at brace depth zero instead of the plain
    /// textual rule. Fewer false positives, but diverges from the behavior
    /// of the export tooling this crate recovers from.
    pub comma_insert_depth_zero_only: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            anchor_field: "grade".to_string(),
            numeric_fields: vec!["question_number".to_string()],
            key_order: ["5", "4", "3", "pre2", "2", "pre1", "1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            items_field: "questions".to_string(),
            context_chars: 100,
            comma_insert_depth_zero_only: false,
        }
    }
}
