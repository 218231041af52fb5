//! Element model for a parsed flowchart
//!
//! A [`Diagram`] is an optional init block, an optional declaration and the
//! ordered statements of its body. Statement order is never changed by any
//! stage of the pipeline.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::{ArrowKind, DiagramKind, Direction, NodeShape};

/// `flowchart LR`, `graph TD`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Declaration {
    pub kind: DiagramKind,
    pub direction: Direction,
}

impl Declaration {
    pub fn new(kind: DiagramKind, direction: Direction) -> Self {
        Self { kind, direction }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.direction)
    }
}

/// A node written on its own line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDefinition {
    pub id: String,
    pub label: Option<String>,
    pub shape: NodeShape,
}

impl NodeDefinition {
    pub fn new(id: impl Into<String>, label: Option<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            label,
            shape,
        }
    }

    /// A node without brackets
    pub fn bare(id: impl Into<String>) -> Self {
        Self::new(id, None, NodeShape::Rectangle)
    }
}

/// An edge between two node identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub arrow: ArrowKind,
    pub label: Option<String>,
}

impl Connection {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        arrow: ArrowKind,
        label: Option<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            arrow,
            label,
        }
    }
}

/// Every kind of line a flowchart body can hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramElement {
    Declaration(Declaration),
    Comment {
        text: String,
    },
    Node(NodeDefinition),
    Connection(Connection),
    SubgraphStart {
        id: String,
        label: Option<String>,
    },
    SubgraphEnd,
    ClassDef {
        name: String,
        properties: String,
    },
    ClassApplication {
        node_ids: Vec<String>,
        class_name: String,
    },
    /// An empty `indices` list stands for `linkStyle default`
    LinkStyle {
        indices: Vec<usize>,
        properties: String,
    },
    /// Kept verbatim
    Unrecognized {
        text: String,
    },
}

/// A classified line together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub element: DiagramElement,
    /// The source line, untrimmed
    pub raw: String,
    /// 1-based line number within the diagram body
    pub line: usize,
    /// Width of the leading whitespace in the source line; never used for output
    pub indent: usize,
}

impl Statement {
    /// Build a statement that has no source line behind it
    pub fn synthetic(element: DiagramElement) -> Self {
        Self {
            element,
            raw: String::new(),
            line: 0,
            indent: 0,
        }
    }
}

/// Settings read from a `%%{init: {...}}%%` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitConfig {
    pub theme: String,
    /// Scalar values are stored as their string form
    pub theme_variables: BTreeMap<String, String>,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            theme_variables: BTreeMap::new(),
        }
    }
}

/// A parsed flowchart
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagram {
    pub init: Option<InitConfig>,
    pub declaration: Option<Declaration>,
    pub statements: Vec<Statement>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in source order
    pub fn elements(&self) -> impl Iterator<Item = &DiagramElement> {
        self.statements.iter().map(|s| &s.element)
    }

    /// Connections in source order; the position in this iterator is the
    /// link-style ordinal
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.elements().filter_map(|element| match element {
            DiagramElement::Connection(connection) => Some(connection),
            _ => None,
        })
    }

    /// Node definitions in source order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeDefinition> {
        self.elements().filter_map(|element| match element {
            DiagramElement::Node(node) => Some(node),
            _ => None,
        })
    }

    /// The part of the diagram that formatting must preserve
    pub fn signature(&self) -> Signature {
        Signature {
            nodes: self
                .nodes()
                .map(|node| {
                    (
                        node.id.clone(),
                        node.label.as_deref().map(|l| l.trim_matches('"').to_string()),
                    )
                })
                .collect(),
            connections: self.connections().cloned().collect(),
        }
    }
}

/// Ordered node (id, label) pairs and connections of a diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub nodes: Vec<(String, Option<String>)>,
    pub connections: Vec<Connection>,
}

impl Signature {
    /// Describe the first difference to `other`, if any
    pub fn first_difference(&self, other: &Signature) -> Option<String> {
        if self.nodes.len() != other.nodes.len() {
            return Some(format!(
                "node count changed from {} to {}",
                self.nodes.len(),
                other.nodes.len()
            ));
        }
        if self.connections.len() != other.connections.len() {
            return Some(format!(
                "connection count changed from {} to {}",
                self.connections.len(),
                other.connections.len()
            ));
        }
        for (before, after) in self.nodes.iter().zip(&other.nodes) {
            if before != after {
                return Some(format!("node {:?} became {:?}", before, after));
            }
        }
        for (index, (before, after)) in self.connections.iter().zip(&other.connections).enumerate()
        {
            if before != after {
                return Some(format!(
                    "connection {} changed from {} {} {} to {} {} {}",
                    index,
                    before.source,
                    before.arrow,
                    before.target,
                    after.source,
                    after.arrow,
                    after.target
                ));
            }
        }
        None
    }
}
