//! Core type definitions for diagram tidying
//!
//! The fixed vocabulary the tidier understands: diagram kinds, layout
//! directions, node shapes and arrow glyphs.

use std::fmt;

/// Diagram kind named by the declaration line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DiagramKind {
    /// `flowchart`
    #[default]
    Flowchart,
    /// `graph`
    Graph,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::Flowchart => write!(f, "flowchart"),
            DiagramKind::Graph => write!(f, "graph"),
        }
    }
}

/// Layout direction from the declaration line
///
/// `TB` and `TD` mean the same thing to Mermaid but are kept apart so a
/// diagram keeps the spelling its author chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Top to bottom (TB)
    #[default]
    TopBottom,
    /// Top down (TD)
    TopDown,
    /// Bottom to top (BT)
    BottomTop,
    /// Left to right (LR)
    LeftRight,
    /// Right to left (RL)
    RightLeft,
}

impl Direction {
    /// All directions, in the order they are tried when parsing
    pub const ALL: [Direction; 5] = [
        Direction::TopBottom,
        Direction::TopDown,
        Direction::BottomTop,
        Direction::LeftRight,
        Direction::RightLeft,
    ];

    /// The canonical two-letter keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::TopDown => "TD",
            Direction::BottomTop => "BT",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Node shapes the tidier re-emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum NodeShape {
    /// Rectangle: `A["label"]`
    #[default]
    Rectangle,
    /// Stadium: `A(["label"])`
    Stadium,
    /// Forward trapezoid: `A[/"label"/]`
    ForwardTrapezoid,
    /// Reverse trapezoid: `A[\"label"\]`
    ReverseTrapezoid,
}

impl NodeShape {
    /// Opening and closing bracket pair for this shape
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            NodeShape::Rectangle => ("[", "]"),
            NodeShape::Stadium => ("([", "])"),
            NodeShape::ForwardTrapezoid => ("[/", "/]"),
            NodeShape::ReverseTrapezoid => ("[\\", "\\]"),
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeShape::Rectangle => write!(f, "rectangle"),
            NodeShape::Stadium => write!(f, "stadium"),
            NodeShape::ForwardTrapezoid => write!(f, "forward-trapezoid"),
            NodeShape::ReverseTrapezoid => write!(f, "reverse-trapezoid"),
        }
    }
}

/// Arrow glyphs between two node identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ArrowKind {
    /// Solid arrow: `-->`
    #[default]
    Solid,
    /// Solid arrow at both ends: `<-->`
    Bidirectional,
    /// Dotted arrow: `-.->`
    DottedArrow,
    /// Plain line: `---`
    Line,
    /// Dotted arrow at both ends: `<-.->`
    DottedBidirectional,
    /// Dotted link with the label between the dashes: `-. label .-`
    DottedInline,
}

impl ArrowKind {
    /// Glyphs that stand between source and target, longest first
    pub const GLYPHS: [ArrowKind; 5] = [
        ArrowKind::DottedBidirectional,
        ArrowKind::Bidirectional,
        ArrowKind::DottedArrow,
        ArrowKind::Solid,
        ArrowKind::Line,
    ];

    /// The glyph as written between two identifiers
    pub fn glyph(&self) -> &'static str {
        match self {
            ArrowKind::Solid => "-->",
            ArrowKind::Bidirectional => "<-->",
            ArrowKind::DottedArrow => "-.->",
            ArrowKind::Line => "---",
            ArrowKind::DottedBidirectional => "<-.->",
            ArrowKind::DottedInline => "-..-",
        }
    }

    /// Returns true if the glyph carries a dotted marker on either side
    pub fn is_dotted(&self) -> bool {
        matches!(
            self,
            ArrowKind::DottedArrow | ArrowKind::DottedBidirectional | ArrowKind::DottedInline
        )
    }

    /// Returns true for the dotted arrow glyphs (`-.->`, `<-.->`)
    pub fn is_dotted_arrow(&self) -> bool {
        matches!(self, ArrowKind::DottedArrow | ArrowKind::DottedBidirectional)
    }
}

impl fmt::Display for ArrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_keywords() {
        let keywords: Vec<_> = Direction::ALL.iter().map(Direction::keyword).collect();
        assert_eq!(keywords, vec!["TB", "TD", "BT", "LR", "RL"]);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::TopBottom.to_string(), "TB");
        assert_eq!(Direction::TopDown.to_string(), "TD");
        assert_eq!(Direction::default(), Direction::TopBottom);
    }

    #[test]
    fn test_node_shape_delimiters() {
        assert_eq!(NodeShape::Rectangle.delimiters(), ("[", "]"));
        assert_eq!(NodeShape::Stadium.delimiters(), ("([", "])"));
        assert_eq!(NodeShape::ForwardTrapezoid.delimiters(), ("[/", "/]"));
        assert_eq!(NodeShape::ReverseTrapezoid.delimiters(), ("[\\", "\\]"));
    }

    #[test]
    fn test_arrow_kind_properties() {
        assert!(ArrowKind::DottedArrow.is_dotted());
        assert!(ArrowKind::DottedInline.is_dotted());
        assert!(ArrowKind::DottedBidirectional.is_dotted_arrow());
        assert!(!ArrowKind::DottedInline.is_dotted_arrow());
        assert!(!ArrowKind::Solid.is_dotted());
        assert!(!ArrowKind::Line.is_dotted());
    }

    #[test]
    fn test_glyphs_longest_first() {
        let lengths: Vec<_> = ArrowKind::GLYPHS.iter().map(|a| a.glyph().len()).collect();
        assert!(lengths.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(!ArrowKind::GLYPHS.contains(&ArrowKind::DottedInline));
    }

    #[test]
    fn test_arrow_kind_display() {
        assert_eq!(ArrowKind::Solid.to_string(), "-->");
        assert_eq!(ArrowKind::Bidirectional.to_string(), "<-->");
        assert_eq!(ArrowKind::DottedArrow.to_string(), "-.->");
        assert_eq!(ArrowKind::Line.to_string(), "---");
        assert_eq!(ArrowKind::DottedBidirectional.to_string(), "<-.->");
    }

    #[test]
    fn test_diagram_kind_display() {
        assert_eq!(DiagramKind::Flowchart.to_string(), "flowchart");
        assert_eq!(DiagramKind::Graph.to_string(), "graph");
    }
}
