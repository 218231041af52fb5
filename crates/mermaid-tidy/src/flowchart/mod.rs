//! Flowchart tidying
//!
//! [`tidy`] runs the full pipeline for one diagram body: parse, format,
//! re-parse the output and check that no node or connection was lost or
//! altered on the way.

use tracing::{debug, span, warn, Level};

use crate::core::{StyleConfig, TidyError};

pub mod classifier;
mod formatter;
pub mod grammar;
pub mod init_block;
mod model;
mod parser;

pub use classifier::{LinkBuckets, LinkCategory, NodeClasses};
pub use formatter::*;
pub use model::*;
pub use parser::*;

/// Result of tidying one diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOutcome {
    pub formatted: String,
    /// False when the canonical text matches the input up to surrounding
    /// whitespace
    pub changed: bool,
}

/// Tidy one diagram body.
///
/// Returns [`TidyError::RoundTrip`] when the formatted text no longer
/// describes the same nodes and connections as the input.
pub fn tidy(input: &str, config: &StyleConfig) -> Result<FormatOutcome, TidyError> {
    let span = span!(Level::INFO, "tidy", input_len = input.len());
    let _enter = span.enter();

    let diagram = FlowchartParser::new().parse(input);
    let formatted = FlowchartFormatter::with_config(config.clone()).format(&diagram);
    verify_round_trip(&diagram, &formatted)?;

    let changed = formatted.trim() != input.trim();
    debug!(changed, "Tidied diagram");
    Ok(FormatOutcome { formatted, changed })
}

/// Check that `formatted` parses back to the nodes and connections of
/// `diagram`
pub fn verify_round_trip(diagram: &Diagram, formatted: &str) -> Result<(), TidyError> {
    let reparsed = FlowchartParser::new().parse(formatted);
    match diagram.signature().first_difference(&reparsed.signature()) {
        Some(difference) => {
            warn!(%difference, "Formatted diagram does not round-trip");
            Err(TidyError::round_trip(difference))
        }
        None => Ok(()),
    }
}
