//! Canonical flowchart formatter
//!
//! Walks the statements of a [`Diagram`] in order and re-emits each one in
//! the canonical style. With color enforcement on, the first class
//! definition, class application and link style are each replaced by the
//! generated canonical lines and any later ones are dropped.

use tracing::{debug, span, trace, Level};

use super::classifier::{classify_links, classify_nodes, LinkBuckets, NodeClasses};
use super::{Connection, Declaration, Diagram, DiagramElement, NodeDefinition};
use crate::core::{ArrowKind, StyleConfig};

/// Flowchart formatter
#[derive(Debug, Clone, Default)]
pub struct FlowchartFormatter {
    config: StyleConfig,
}

/// Tracks which canonical blocks have already been emitted
#[derive(Debug, Default)]
struct Seen {
    class_def: bool,
    class_application: bool,
    link_style: bool,
}

/// Classification results, only computed when enforcement is on
struct Palette {
    nodes: NodeClasses,
    links: LinkBuckets,
}

impl FlowchartFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StyleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Render `diagram` as canonical text, lines joined by `\n`
    pub fn format(&self, diagram: &Diagram) -> String {
        let span = span!(
            Level::DEBUG,
            "format_flowchart",
            statements = diagram.statements.len(),
            enforce = self.config.enforce_standard_colors
        );
        let _enter = span.enter();

        let mut lines = Vec::with_capacity(diagram.statements.len() + 6);

        if let Some(init) = &self.config.canonical_init_block {
            lines.push(init.clone());
        }
        lines.push(diagram.declaration.unwrap_or_default().to_string());

        let palette = self.config.enforce_standard_colors.then(|| Palette {
            nodes: classify_nodes(diagram),
            links: classify_links(diagram),
        });
        if let Some(palette) = &palette {
            debug!(
                content_nodes = palette.nodes.content.len(),
                workflow_nodes = palette.nodes.workflow.len(),
                "Classified diagram"
            );
        }

        let mut depth = 0usize;
        let mut seen = Seen::default();

        for statement in &diagram.statements {
            match (&statement.element, &palette) {
                (DiagramElement::SubgraphStart { .. }, _) => {
                    lines.push(self.line(depth, &statement.element));
                    depth += 1;
                }
                (DiagramElement::SubgraphEnd, _) => {
                    if depth == 0 {
                        trace!(line = statement.line, "Unmatched end, depth stays at zero");
                    }
                    depth = depth.saturating_sub(1);
                    lines.push(self.line(depth, &statement.element));
                }
                (DiagramElement::ClassDef { .. }, Some(_)) => {
                    if !std::mem::replace(&mut seen.class_def, true) {
                        lines.extend(self.class_definitions(depth));
                    }
                }
                (DiagramElement::ClassApplication { .. }, Some(palette)) => {
                    if !std::mem::replace(&mut seen.class_application, true) {
                        lines.extend(self.class_applications(depth, &palette.nodes));
                    }
                }
                (DiagramElement::LinkStyle { .. }, Some(palette)) => {
                    if !std::mem::replace(&mut seen.link_style, true) {
                        lines.extend(self.link_styles(depth, &palette.links));
                    }
                }
                (element, _) => lines.push(self.line(depth, element)),
            }
        }

        if let Some(palette) = &palette {
            if !seen.link_style && !palette.links.is_empty() {
                trace!("Appending link styles");
                lines.extend(self.link_styles(depth, &palette.links));
            }
        }

        lines.join("\n")
    }

    fn indent(&self, depth: usize) -> String {
        self.config.indent_unit.repeat(depth + 1)
    }

    fn line(&self, depth: usize, element: &DiagramElement) -> String {
        format!("{}{}", self.indent(depth), render_element(element))
    }

    fn class_definitions(&self, depth: usize) -> Vec<String> {
        let indent = self.indent(depth);
        vec![
            format!(
                "{}classDef {} {};",
                indent, self.config.content_class_name, self.config.content_class_properties
            ),
            format!(
                "{}classDef {} {};",
                indent, self.config.workflow_class_name, self.config.workflow_class_properties
            ),
        ]
    }

    fn class_applications(&self, depth: usize, classes: &NodeClasses) -> Vec<String> {
        let indent = self.indent(depth);
        [
            (&classes.content, &self.config.content_class_name),
            (&classes.workflow, &self.config.workflow_class_name),
        ]
        .into_iter()
        .filter(|(ids, _)| !ids.is_empty())
        .map(|(ids, class_name)| {
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            format!("{}class {} {};", indent, ids.join(","), class_name)
        })
        .collect()
    }

    fn link_styles(&self, depth: usize, buckets: &LinkBuckets) -> Vec<String> {
        let indent = self.indent(depth);
        [
            (&buckets.main, &self.config.main_link_properties),
            (&buckets.workflow, &self.config.workflow_link_properties),
            (&buckets.cross_reference, &self.config.crossref_link_properties),
        ]
        .into_iter()
        .filter(|(ordinals, _)| !ordinals.is_empty())
        .map(|(ordinals, properties)| {
            format!("{}linkStyle {} {};", indent, join_ordinals(ordinals), properties)
        })
        .collect()
    }
}

fn join_ordinals(ordinals: &[usize]) -> String {
    ordinals
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Canonical text of one element, without indentation
pub fn render_element(element: &DiagramElement) -> String {
    match element {
        DiagramElement::Declaration(declaration) => render_declaration(declaration),
        DiagramElement::Comment { text } if text.is_empty() => "%%".to_string(),
        DiagramElement::Comment { text } => format!("%% {}", text),
        DiagramElement::Node(node) => render_node(node),
        DiagramElement::Connection(connection) => render_connection(connection),
        DiagramElement::SubgraphStart { id, label } => match label {
            Some(label) => format!("subgraph {}[\"{}\"]", id, label.trim_matches('"')),
            None => format!("subgraph {}", id),
        },
        DiagramElement::SubgraphEnd => "end".to_string(),
        DiagramElement::ClassDef { name, properties } => {
            format!("classDef {} {};", name, properties.trim_end_matches(';'))
        }
        DiagramElement::ClassApplication {
            node_ids,
            class_name,
        } => format!("class {} {};", node_ids.join(","), class_name),
        DiagramElement::LinkStyle {
            indices,
            properties,
        } if indices.is_empty() => format!("linkStyle default {}", properties),
        DiagramElement::LinkStyle {
            indices,
            properties,
        } => format!("linkStyle {} {}", join_ordinals(indices), properties),
        DiagramElement::Unrecognized { text } => text.trim().to_string(),
    }
}

fn render_declaration(declaration: &Declaration) -> String {
    declaration.to_string()
}

fn render_node(node: &NodeDefinition) -> String {
    match &node.label {
        Some(label) => {
            let (open, close) = node.shape.delimiters();
            format!("{}{}\"{}\"{}", node.id, open, label.trim_matches('"'), close)
        }
        None => node.id.clone(),
    }
}

fn render_connection(connection: &Connection) -> String {
    let Connection {
        source,
        target,
        arrow,
        label,
    } = connection;
    match (arrow, label) {
        (ArrowKind::DottedInline, Some(label)) => {
            format!("{} -. \"{}\" .- {}", source, label, target)
        }
        (arrow, Some(label)) => format!("{} {}|\"{}\"| {}", source, arrow, label, target),
        (arrow, None) => format!("{} {} {}", source, arrow, target),
    }
}
