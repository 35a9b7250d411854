pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod repair;
pub mod report;
pub mod scan;
pub mod stats;
pub mod strict;
pub mod types;

pub use error::{ExtractError, FailureKind};
pub use pipeline::{recover, recover_bytes, Recovery};
pub use report::{aggregate, ExtractionReport};
pub use types::{AnchorMatch, ExtractOptions, ObjectSpan, ParseOutcome, RepairAction};
