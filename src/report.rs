use serde::Serialize;
use serde_json::Value;

use crate::error::FailureKind;
use crate::types::ParseOutcome;

/// Per-run outcome report: one entry per anchor, in anchor order, plus
/// summary counts. `outcomes.len() == anchors_found` holds by construction;
/// no anchored object is silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub outcomes: Vec<ParseOutcome>,
    pub anchors_found: usize,
    pub parsed: usize,
    pub failed: usize,
    pub unmatched: usize,
}

impl ExtractionReport {
    /// A run is successful when at least one object was recovered,
    /// regardless of partial failures.
    pub fn is_success(&self) -> bool {
        self.parsed > 0
    }

    /// One human-readable line per anchor plus a trailing counts line.
    /// `items_field` names each object's nested item list.
    pub fn diagnostic_lines(&self, items_field: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.outcomes.len() + 1);
        for outcome in &self.outcomes {
            match outcome {
                ParseOutcome::Parsed { key, object } => {
                    let items = object
                        .get(items_field)
                        .and_then(Value::as_array)
                        .map_or(0, Vec::len);
                    lines.push(format!("ok   {key}: {items} items"));
                }
                ParseOutcome::Failed { key, kind, .. } => {
                    lines.push(format!("fail {key}: {kind}"));
                }
            }
        }
        lines.push(format!(
            "anchors: {}, parsed: {}, failed: {}, unmatched: {}",
            self.anchors_found, self.parsed, self.failed, self.unmatched
        ));
        lines
    }
}

/// Computes summary counts and the canonically ordered success list.
///
/// Only the parsed subset is reordered: a stable sort by the key's position
/// in `key_order`, with keys absent from the list after all listed keys and
/// input order preserved within a tier. Failed outcomes stay in the report
/// in anchor order and never appear in the success list.
pub fn aggregate(outcomes: Vec<ParseOutcome>, key_order: &[String]) -> (Vec<Value>, ExtractionReport) {
    let anchors_found = outcomes.len();
    let mut parsed = 0usize;
    let mut failed = 0usize;
    let mut unmatched = 0usize;

    let mut ranked: Vec<(usize, usize, Value)> = Vec::new();
    for (input_idx, outcome) in outcomes.iter().enumerate() {
        match outcome {
            ParseOutcome::Parsed { key, object } => {
                parsed += 1;
                let tier = key_order
                    .iter()
                    .position(|k| k == key)
                    .unwrap_or(usize::MAX);
                ranked.push((tier, input_idx, object.clone()));
            }
            ParseOutcome::Failed { kind, .. } => match kind {
                FailureKind::UnmatchedBrace => unmatched += 1,
                FailureKind::StructuralParseError { .. } => failed += 1,
            },
        }
    }
    ranked.sort_by_key(|(tier, input_idx, _)| (*tier, *input_idx));

    let objects = ranked.into_iter().map(|(_, _, object)| object).collect();
    let report = ExtractionReport {
        outcomes,
        anchors_found,
        parsed,
        failed,
        unmatched,
    };
    (objects, report)
}
