//! Node and edge classification for the canonical palette
//!
//! Nodes are either content nodes or workflow nodes. Edges fall into one of
//! three link-style buckets by their position among all connections.

use std::collections::BTreeSet;

use tracing::trace;

use super::{Connection, Diagram, DiagramElement};

/// Marker that turns a subgraph into a workflow subgraph (case-sensitive)
pub const WORKFLOW_MARKER: &str = "Workflow";

/// Node ids sorted into the two style classes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeClasses {
    pub content: BTreeSet<String>,
    pub workflow: BTreeSet<String>,
}

/// Link-style bucket of a single connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCategory {
    Main,
    Workflow,
    CrossReference,
}

impl LinkCategory {
    /// Labeled dotted links are cross references, other dotted arrows are
    /// workflow links, everything else is a main link
    pub fn of(connection: &Connection) -> Self {
        if connection.label.is_some() && connection.arrow.is_dotted() {
            LinkCategory::CrossReference
        } else if connection.arrow.is_dotted_arrow() {
            LinkCategory::Workflow
        } else {
            LinkCategory::Main
        }
    }
}

/// Connection ordinals grouped by link category, each in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkBuckets {
    pub main: Vec<usize>,
    pub workflow: Vec<usize>,
    pub cross_reference: Vec<usize>,
}

impl LinkBuckets {
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.workflow.is_empty() && self.cross_reference.is_empty()
    }
}

/// Returns true for ids of the form `W` followed by one or more ASCII digits
pub fn is_workflow_id(id: &str) -> bool {
    id.strip_prefix('W')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Sort every known node of `diagram` into content or workflow.
///
/// Known nodes are defined nodes plus connection endpoints. Subgraph ids
/// are never styled. The workflow-subgraph flag is flat: any `end` clears
/// it, whichever subgraph it closes.
pub fn classify_nodes(diagram: &Diagram) -> NodeClasses {
    let mut known = BTreeSet::new();
    let mut subgraph_ids = BTreeSet::new();
    let mut workflow = BTreeSet::new();
    let mut in_workflow_subgraph = false;

    for element in diagram.elements() {
        match element {
            DiagramElement::Node(node) => {
                known.insert(node.id.clone());
                if in_workflow_subgraph {
                    workflow.insert(node.id.clone());
                }
            }
            DiagramElement::Connection(connection) => {
                known.insert(connection.source.clone());
                known.insert(connection.target.clone());
            }
            DiagramElement::SubgraphStart { id, label } => {
                subgraph_ids.insert(id.clone());
                if id.contains(WORKFLOW_MARKER)
                    || label
                        .as_deref()
                        .is_some_and(|label| label.contains(WORKFLOW_MARKER))
                {
                    trace!(subgraph = %id, "Entering workflow subgraph");
                    in_workflow_subgraph = true;
                }
            }
            DiagramElement::SubgraphEnd => in_workflow_subgraph = false,
            _ => {}
        }
    }

    workflow.extend(known.iter().filter(|id| is_workflow_id(id)).cloned());

    let content = known
        .iter()
        .filter(|id| !subgraph_ids.contains(*id) && !workflow.contains(*id))
        .cloned()
        .collect();
    let workflow = workflow
        .into_iter()
        .filter(|id| !subgraph_ids.contains(id))
        .collect();

    NodeClasses { content, workflow }
}

/// Bucket connection ordinals by link category
pub fn classify_links(diagram: &Diagram) -> LinkBuckets {
    let mut buckets = LinkBuckets::default();
    for (ordinal, connection) in diagram.connections().enumerate() {
        match LinkCategory::of(connection) {
            LinkCategory::Main => buckets.main.push(ordinal),
            LinkCategory::Workflow => buckets.workflow.push(ordinal),
            LinkCategory::CrossReference => buckets.cross_reference.push(ordinal),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowchart::FlowchartParser;

    fn parse(input: &str) -> Diagram {
        FlowchartParser::new().parse(input)
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_workflow_id_pattern() {
        assert!(is_workflow_id("W1"));
        assert!(is_workflow_id("W042"));
        assert!(!is_workflow_id("W"));
        assert!(!is_workflow_id("W1a"));
        assert!(!is_workflow_id("w1"));
        assert!(!is_workflow_id("Work"));
    }

    #[test]
    fn test_content_and_workflow_nodes() {
        let classes = classify_nodes(&parse("flowchart TB\nStart --> W3\nW3 --> End1"));
        assert_eq!(classes.content, set(&["End1", "Start"]));
        assert_eq!(classes.workflow, set(&["W3"]));
    }

    #[test]
    fn test_nodes_inside_workflow_subgraph() {
        let input = "flowchart TB\nsubgraph Steps[\"Workflow steps\"]\nPlan\nBuild\nend\nShip\nPlan --> Ship";
        let classes = classify_nodes(&parse(input));
        assert_eq!(classes.workflow, set(&["Build", "Plan"]));
        assert_eq!(classes.content, set(&["Ship"]));
    }

    #[test]
    fn test_subgraph_ids_are_not_styled() {
        let input = "flowchart TB\nsubgraph Group\nA\nend\nGroup --> A";
        let classes = classify_nodes(&parse(input));
        assert_eq!(classes.content, set(&["A"]));
        assert!(classes.workflow.is_empty());
    }

    #[test]
    fn test_any_end_clears_workflow_flag() {
        let input = "subgraph Workflow\nsubgraph Inner\nX\nend\nY\nend";
        let classes = classify_nodes(&parse(input));
        assert_eq!(classes.workflow, set(&["X"]));
        assert_eq!(classes.content, set(&["Y"]));
    }

    #[test]
    fn test_link_buckets() {
        let input = "A --> B\nB -.-> C\nC -. see .- D\nD <-.->|both| A\nA --- D\nB <-.-> D";
        let buckets = classify_links(&parse(input));
        assert_eq!(buckets.main, vec![0, 4]);
        assert_eq!(buckets.workflow, vec![1, 5]);
        assert_eq!(buckets.cross_reference, vec![2, 3]);
    }

    #[test]
    fn test_no_connections_no_buckets() {
        assert!(classify_links(&parse("A\nB")).is_empty());
    }
}
