//! mermaid-tidy - Normalize Mermaid flowcharts into one canonical style
//!
//! A library for parsing Mermaid flowchart diagrams and re-emitting them with
//! consistent indentation, quoting, color classes and edge styling.
//!
//! # Quick Start
//!
//! ```rust
//! use mermaid_tidy::tidy;
//!
//! let outcome = tidy("graph LR\nA-->B", &Default::default()).unwrap();
//! assert!(outcome.changed);
//! assert!(outcome.formatted.starts_with("graph LR\n  A --> B"));
//! assert!(outcome.formatted.contains("linkStyle 0 "));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use mermaid_tidy::prelude::*;
//!
//! let diagram = FlowchartParser::new().parse("flowchart TB\nW1 -.-> Guide\nGuide([Read me])");
//! assert_eq!(diagram.connections().count(), 1);
//!
//! let config = StyleConfig::passthrough();
//! let text = FlowchartFormatter::with_config(config).format(&diagram);
//! assert_eq!(text, "flowchart TB\n  W1 -.-> Guide\n  Guide([\"Read me\"])");
//! ```
//!
//! Whole Markdown documents go through [`markdown::MarkdownProcessor`]:
//!
//! ```rust
//! use mermaid_tidy::markdown::MarkdownProcessor;
//!
//! let report = MarkdownProcessor::new().process_document("# Doc\n```mermaid\nA\n```\n");
//! assert_eq!(report.diagrams_found, 1);
//! assert!(report.formatted.contains("```mermaid\nflowchart TB\n  A\n```"));
//! ```

pub mod core;
pub mod flowchart;
pub mod markdown;

pub use crate::core::*;
pub use flowchart::{tidy, FormatOutcome};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ArrowKind, DiagramKind, Direction, NodeShape, StyleConfig, TidyError,
    };
    pub use crate::flowchart::{
        tidy, Connection, Declaration, Diagram, DiagramElement, FlowchartFormatter,
        FlowchartParser, FormatOutcome, NodeDefinition, Statement,
    };
    pub use crate::markdown::{
        collect_markdown_files, find_mermaid_blocks, unified_diff, MarkdownProcessor,
        RunMode, RunSummary,
    };
}

/// Parse a flowchart body without formatting it
///
/// # Example
/// ```rust
/// use mermaid_tidy::{parse, Direction};
///
/// let diagram = parse("graph RL\nA --> B\nB --> C");
/// assert_eq!(diagram.connections().count(), 2);
/// assert_eq!(diagram.declaration.unwrap().direction, Direction::RightLeft);
/// ```
pub fn parse(input: &str) -> flowchart::Diagram {
    flowchart::FlowchartParser::new().parse(input)
}

/// Format a flowchart body with the default style, skipping the round-trip
/// check that [`tidy`] performs
///
/// # Example
/// ```rust
/// use mermaid_tidy::format;
///
/// assert_eq!(format("X"), "flowchart TB\n  X");
/// ```
pub fn format(input: &str) -> String {
    flowchart::FlowchartFormatter::new().format(&parse(input))
}
