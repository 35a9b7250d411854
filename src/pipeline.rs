use tracing::debug;

use crate::error::{ExtractError, FailureKind};
use crate::normalize::normalize_separators;
use crate::repair::SyntaxRepairer;
use crate::report::{aggregate, ExtractionReport};
use crate::scan::{anchor_pattern, find_anchors, match_object_span};
use crate::strict::{context_snippet, parse_object};
use crate::types::{ExtractOptions, ParseOutcome, RepairAction};

/// Everything one extraction run produces: the canonically ordered recovered
/// objects, the per-anchor report, and the applied repair log. All values;
/// nothing persists beyond the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovery {
    pub objects: Vec<serde_json::Value>,
    pub report: ExtractionReport,
    pub repairs: Vec<RepairAction>,
}

/// Runs the whole pipeline over one in-memory document: separator
/// normalization, textual repair, anchor scan, per-anchor span matching and
/// strict parsing, canonical aggregation. Per-object failures are captured
/// into the report; only a document with no anchors at all is an error.
pub fn recover(text: &str, opts: &ExtractOptions) -> Result<Recovery, ExtractError> {
    let normalized = normalize_separators(text);
    let (repaired, repairs) = SyntaxRepairer::new(opts).repair(&normalized);
    debug!(fixups = repairs.len(), "repair passes applied");

    let anchors = find_anchors(&repaired, &anchor_pattern(opts));
    if anchors.is_empty() {
        return Err(ExtractError::NoAnchorsFound {
            field: opts.anchor_field.clone(),
        });
    }
    debug!(anchors = anchors.len(), "anchors located");

    let mut outcomes = Vec::with_capacity(anchors.len());
    for anchor in &anchors {
        let outcome = match match_object_span(&repaired, anchor.start) {
            None => ParseOutcome::Failed {
                key: anchor.key.clone(),
                kind: FailureKind::UnmatchedBrace,
                context: None,
            },
            Some(span) => match parse_object(span.slice(&repaired)) {
                Ok(object) => ParseOutcome::Parsed {
                    key: anchor.key.clone(),
                    object,
                },
                Err(failure) => {
                    let context =
                        context_snippet(span.slice(&repaired), failure.offset, opts.context_chars);
                    ParseOutcome::Failed {
                        key: anchor.key.clone(),
                        kind: FailureKind::StructuralParseError {
                            message: failure.message,
                            offset: failure.offset,
                        },
                        context: Some(context),
                    }
                }
            },
        };
        outcomes.push(outcome);
    }

    let (objects, report) = aggregate(outcomes, &opts.key_order);
    debug!(
        parsed = report.parsed,
        failed = report.failed,
        unmatched = report.unmatched,
        "outcomes aggregated"
    );
    Ok(Recovery {
        objects,
        report,
        repairs,
    })
}

/// Byte-level entry point: strips a UTF-8 BOM and decodes the rest lossily
/// before recovering. Defective exports occasionally carry stray bytes.
pub fn recover_bytes(input: &[u8], opts: &ExtractOptions) -> Result<Recovery, ExtractError> {
    let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
    let text = String::from_utf8_lossy(input);
    recover(&text, opts)
}
