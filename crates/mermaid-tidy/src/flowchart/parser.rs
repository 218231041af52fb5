//! Flowchart parser implementation
//!
//! Cuts out the init block, then classifies each non-blank line by trying the
//! forms in [`LINE_FORMS`] in order. The first form that accounts for the
//! whole trimmed line wins; a line no form accepts is kept as
//! [`DiagramElement::Unrecognized`]. Parsing never fails.

use tracing::{debug, span, trace, Level};

use super::grammar::{self, recognize};
use super::init_block::extract_init_block;
use super::{Diagram, DiagramElement, Statement};

/// A named line recognizer
#[derive(Clone, Copy)]
pub struct LineForm {
    pub name: &'static str,
    pub recognize: fn(&str) -> Option<DiagramElement>,
}

impl std::fmt::Debug for LineForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineForm").field("name", &self.name).finish()
    }
}

/// Line forms in priority order.
///
/// Earlier forms shadow later ones: `end` is a subgraph end before it is a
/// bare node, `A --> B` is a connection before anything else, and the
/// trapezoid and stadium brackets are tried before the plain rectangle.
pub const LINE_FORMS: [LineForm; 16] = [
    LineForm {
        name: "declaration",
        recognize: declaration,
    },
    LineForm {
        name: "comment",
        recognize: comment,
    },
    LineForm {
        name: "subgraph-start",
        recognize: subgraph_start,
    },
    LineForm {
        name: "subgraph-end",
        recognize: subgraph_end,
    },
    LineForm {
        name: "class-definition",
        recognize: class_definition,
    },
    LineForm {
        name: "class-application",
        recognize: class_application,
    },
    LineForm {
        name: "link-style",
        recognize: link_style,
    },
    LineForm {
        name: "labeled-pipe-connection",
        recognize: labeled_pipe_connection,
    },
    LineForm {
        name: "dotted-inline-connection",
        recognize: dotted_inline_connection,
    },
    LineForm {
        name: "unlabeled-connection",
        recognize: unlabeled_connection,
    },
    LineForm {
        name: "stadium-node",
        recognize: stadium_node,
    },
    LineForm {
        name: "forward-trapezoid-node",
        recognize: forward_trapezoid_node,
    },
    LineForm {
        name: "reverse-trapezoid-node",
        recognize: reverse_trapezoid_node,
    },
    LineForm {
        name: "quoted-rectangle-node",
        recognize: quoted_rectangle_node,
    },
    LineForm {
        name: "unquoted-rectangle-node",
        recognize: unquoted_rectangle_node,
    },
    LineForm {
        name: "bare-node",
        recognize: bare_node,
    },
];

fn declaration(line: &str) -> Option<DiagramElement> {
    recognize(grammar::declaration(), line)
}

fn comment(line: &str) -> Option<DiagramElement> {
    recognize(grammar::comment(), line)
}

fn subgraph_start(line: &str) -> Option<DiagramElement> {
    recognize(grammar::subgraph_start(), line)
}

fn subgraph_end(line: &str) -> Option<DiagramElement> {
    recognize(grammar::subgraph_end(), line)
}

fn class_definition(line: &str) -> Option<DiagramElement> {
    recognize(grammar::class_definition(), line)
}

fn class_application(line: &str) -> Option<DiagramElement> {
    recognize(grammar::class_application(), line)
}

fn link_style(line: &str) -> Option<DiagramElement> {
    recognize(grammar::link_style(), line)
}

fn labeled_pipe_connection(line: &str) -> Option<DiagramElement> {
    recognize(grammar::labeled_pipe_connection(), line)
}

fn dotted_inline_connection(line: &str) -> Option<DiagramElement> {
    recognize(grammar::dotted_inline_connection(), line)
}

fn unlabeled_connection(line: &str) -> Option<DiagramElement> {
    recognize(grammar::unlabeled_connection(), line)
}

fn stadium_node(line: &str) -> Option<DiagramElement> {
    recognize(grammar::stadium_node(), line)
}

fn forward_trapezoid_node(line: &str) -> Option<DiagramElement> {
    recognize(grammar::forward_trapezoid_node(), line)
}

fn reverse_trapezoid_node(line: &str) -> Option<DiagramElement> {
    recognize(grammar::reverse_trapezoid_node(), line)
}

fn quoted_rectangle_node(line: &str) -> Option<DiagramElement> {
    recognize(grammar::quoted_rectangle_node(), line)
}

fn unquoted_rectangle_node(line: &str) -> Option<DiagramElement> {
    recognize(grammar::unquoted_rectangle_node(), line)
}

fn bare_node(line: &str) -> Option<DiagramElement> {
    recognize(grammar::bare_node(), line)
}

/// Classify one trimmed line, returning the element and the name of the
/// form that accepted it
pub fn classify_line(trimmed: &str) -> (DiagramElement, &'static str) {
    LINE_FORMS
        .iter()
        .find_map(|form| (form.recognize)(trimmed).map(|element| (element, form.name)))
        .unwrap_or_else(|| {
            (
                DiagramElement::Unrecognized {
                    text: trimmed.to_string(),
                },
                "unrecognized",
            )
        })
}

/// Flowchart parser
#[derive(Debug, Default, Clone, Copy)]
pub struct FlowchartParser;

impl FlowchartParser {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        "flowchart"
    }

    /// Parse a diagram body (the text between the Markdown fences)
    pub fn parse(&self, input: &str) -> Diagram {
        let span = span!(Level::DEBUG, "parse_flowchart", input_len = input.len());
        let _enter = span.enter();

        let (init, body) = extract_init_block(input);
        if init.is_some() {
            debug!("Extracted init block");
        }

        let mut diagram = Diagram {
            init,
            ..Diagram::default()
        };

        for (index, raw) in body.split('\n').enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let line = index + 1;
            let indent = raw.len() - raw.trim_start().len();
            let (element, form) = classify_line(trimmed);
            trace!(line, form, text = trimmed, "Classified line");

            if let DiagramElement::Declaration(declaration) = element {
                if diagram.declaration.is_some() {
                    debug!(line, "Later declaration replaces earlier one");
                }
                diagram.declaration = Some(declaration);
                continue;
            }

            diagram.statements.push(Statement {
                element,
                raw: raw.to_string(),
                line,
                indent,
            });
        }

        debug!(
            statements = diagram.statements.len(),
            has_declaration = diagram.declaration.is_some(),
            "Parsed flowchart"
        );
        diagram
    }
}
