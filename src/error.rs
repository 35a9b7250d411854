use serde::Serialize;
use thiserror::Error;

/// Why one anchored object failed to become a recovered object. Captured
/// into the report; never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum FailureKind {
    /// Anchor located but no balancing closing brace before end of text.
    #[error("no matching closing brace before end of text")]
    UnmatchedBrace,
    /// Span is brace-balanced but rejected by the strict parser.
    #[error("parse error at offset {offset}: {message}")]
    StructuralParseError { message: String, offset: usize },
}

/// Terminal failure of a whole extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Zero anchors matched anywhere in the document: the input format
    /// itself is unrecognized, as opposed to a partial per-object failure.
    #[error("no {field:?} anchors found in input")]
    NoAnchorsFound { field: String },
}
