//! Chumsky parsers for single flowchart lines
//!
//! Each function here recognizes exactly one line form. They do not anchor
//! themselves at the end of input; [`recognize`] does that, so a parser
//! only succeeds when it accounts for the whole (trimmed) line.

use chumsky::prelude::*;

use super::{Connection, Declaration, DiagramElement, NodeDefinition};
use crate::core::chumsky_utils::{
    identifier, identifier_string, keyword, optional_whitespace, rest_of_line,
    whitespace_required,
};
use crate::core::{ArrowKind, DiagramKind, Direction, NodeShape};

/// Run `parser` against the whole line.
pub fn recognize<'src, P>(parser: P, line: &'src str) -> Option<DiagramElement>
where
    P: Parser<'src, &'src str, DiagramElement>,
{
    parser.then_ignore(end()).parse(line).into_result().ok()
}

/// Trimmed label text, or `None` when nothing but quotes and whitespace
/// remains
fn label(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.trim_matches('"').trim().is_empty()).then(|| trimmed.to_string())
}

fn direction<'src>() -> impl Parser<'src, &'src str, Direction> + Clone {
    choice(Direction::ALL.map(|direction| keyword(direction.keyword()).to(direction)))
}

/// Arrow glyphs, tried in [`ArrowKind::GLYPHS`] order
fn arrow<'src>() -> impl Parser<'src, &'src str, ArrowKind> + Clone {
    choice(ArrowKind::GLYPHS.map(|arrow| just(arrow.glyph()).to(arrow)))
}

fn optional_quote<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    just('"').or_not().ignored()
}

/// `flowchart LR`, `graph`, `GRAPH td`
pub fn declaration<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    choice((
        keyword("flowchart").to(DiagramKind::Flowchart),
        keyword("graph").to(DiagramKind::Graph),
    ))
    .then_ignore(optional_whitespace())
    .then(direction().or_not())
    .then_ignore(optional_whitespace())
    .map(|(kind, direction)| {
        DiagramElement::Declaration(Declaration::new(kind, direction.unwrap_or_default()))
    })
}

/// `%% text`
pub fn comment<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    just("%%")
        .ignore_then(optional_whitespace())
        .ignore_then(rest_of_line())
        .map(|text: &str| DiagramElement::Comment {
            text: text.to_string(),
        })
}

/// `subgraph id`, `subgraph id["Label"]`, `subgraph id [Label]`
pub fn subgraph_start<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    let quoted = none_of('"')
        .repeated()
        .at_least(1)
        .to_slice()
        .delimited_by(just("[\""), just("\"]"));
    let plain = none_of(']')
        .repeated()
        .at_least(1)
        .to_slice()
        .delimited_by(just('['), just(']'));

    keyword("subgraph")
        .ignore_then(whitespace_required())
        .ignore_then(identifier_string())
        .then(
            optional_whitespace()
                .ignore_then(quoted.or(plain))
                .or_not(),
        )
        .then_ignore(optional_whitespace())
        .map(|(id, text)| DiagramElement::SubgraphStart {
            id,
            label: text.and_then(label),
        })
}

/// `end`
pub fn subgraph_end<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    keyword("end").to(DiagramElement::SubgraphEnd)
}

/// `classDef name fill:#fff,stroke:#000;`
pub fn class_definition<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    keyword("classDef")
        .ignore_then(whitespace_required())
        .ignore_then(identifier_string())
        .then_ignore(whitespace_required())
        .then(rest_of_line().map(|rest: &str| {
            rest.trim_end()
                .trim_end_matches(';')
                .trim_end()
                .to_string()
        }))
        .filter(|(_, properties): &(String, String)| !properties.is_empty())
        .map(|(name, properties)| DiagramElement::ClassDef { name, properties })
}

/// `class A,B,C className;`
pub fn class_application<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    keyword("class")
        .ignore_then(whitespace_required())
        .ignore_then(
            identifier_string()
                .separated_by(just(',').padded_by(optional_whitespace()))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then_ignore(whitespace_required())
        .then(identifier_string())
        .then_ignore(just(';').or_not())
        .then_ignore(optional_whitespace())
        .map(|(node_ids, class_name)| DiagramElement::ClassApplication {
            node_ids,
            class_name,
        })
}

/// `linkStyle 0,2 stroke:#f00` or `linkStyle default stroke:#f00`
pub fn link_style<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    let index = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .to_slice()
        .filter(|digits: &&str| digits.parse::<usize>().is_ok())
        .map(|digits: &str| digits.parse::<usize>().unwrap_or_default());

    let indices = choice((
        keyword("default").to(Vec::new()),
        index
            .separated_by(just(',').padded_by(optional_whitespace()))
            .at_least(1)
            .collect::<Vec<_>>(),
    ));

    keyword("linkStyle")
        .ignore_then(whitespace_required())
        .ignore_then(indices)
        .then_ignore(whitespace_required())
        .then(rest_of_line().map(|rest: &str| rest.trim().to_string()))
        .filter(|(_, properties): &(Vec<usize>, String)| !properties.is_empty())
        .map(|(indices, properties)| DiagramElement::LinkStyle {
            indices,
            properties,
        })
}

/// `A -->|"label"| B`
pub fn labeled_pipe_connection<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone
{
    let pipe_label = just('|')
        .ignore_then(optional_quote())
        .ignore_then(none_of("\"|").repeated().at_least(1).to_slice())
        .then_ignore(optional_quote())
        .then_ignore(just('|'));

    identifier_string()
        .then_ignore(optional_whitespace())
        .then(arrow())
        .then_ignore(optional_whitespace())
        .then(pipe_label)
        .then_ignore(optional_whitespace())
        .then(identifier_string())
        .map(|(((source, arrow), text), target)| {
            DiagramElement::Connection(Connection::new(source, target, arrow, label(text)))
        })
}

/// `A -. "label" .- B`; the closing half may also be written `-.->`.
/// The label is required, so `A -. " " .- B` is not a connection.
pub fn dotted_inline_connection<'src>(
) -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    let closing = choice((just(".-"), just("-.->")));
    let tail = optional_whitespace()
        .then(closing.clone())
        .then(optional_whitespace())
        .then(identifier())
        .then(end());

    identifier_string()
        .then_ignore(optional_whitespace())
        .then_ignore(just("-."))
        .then_ignore(optional_whitespace())
        .then_ignore(optional_quote())
        .then(
            none_of('"')
                .and_is(tail.not())
                .repeated()
                .at_least(1)
                .to_slice()
                .filter(|text: &&str| label(text).is_some()),
        )
        .then_ignore(optional_quote())
        .then_ignore(optional_whitespace())
        .then_ignore(closing)
        .then_ignore(optional_whitespace())
        .then(identifier_string())
        .map(|((source, text), target)| {
            DiagramElement::Connection(Connection::new(
                source,
                target,
                ArrowKind::DottedInline,
                label(text),
            ))
        })
}

/// `A --> B`
pub fn unlabeled_connection<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    identifier_string()
        .then_ignore(optional_whitespace())
        .then(arrow())
        .then_ignore(optional_whitespace())
        .then(identifier_string())
        .map(|((source, arrow), target)| {
            DiagramElement::Connection(Connection::new(source, target, arrow, None))
        })
}

fn node(id: String, text: &str, shape: NodeShape) -> DiagramElement {
    DiagramElement::Node(NodeDefinition::new(id, label(text), shape))
}

/// `A(["label"])`
pub fn stadium_node<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    identifier_string()
        .then_ignore(optional_whitespace())
        .then_ignore(just("(["))
        .then_ignore(optional_whitespace())
        .then_ignore(optional_quote())
        .then(none_of("\"]").repeated().to_slice())
        .then_ignore(optional_quote())
        .then_ignore(optional_whitespace())
        .then_ignore(just("])"))
        .map(|(id, text)| node(id, text, NodeShape::Stadium))
}

/// Trapezoid body between `open` and `close`; the label may not contain
/// a double quote
fn trapezoid<'src>(
    open: &'static str,
    close: &'static str,
    shape: NodeShape,
) -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    identifier_string()
        .then_ignore(optional_whitespace())
        .then_ignore(just(open))
        .then_ignore(optional_whitespace())
        .then_ignore(optional_quote())
        .then(
            none_of('"')
                .and_is(just(close).then(end()).not())
                .repeated()
                .to_slice(),
        )
        .then_ignore(optional_quote())
        .then_ignore(optional_whitespace())
        .then_ignore(just(close))
        .map(move |(id, text)| node(id, text, shape))
}

/// `A[/"label"/]`
pub fn forward_trapezoid_node<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    trapezoid("[/", "/]", NodeShape::ForwardTrapezoid)
}

/// `A[\"label"\]`
pub fn reverse_trapezoid_node<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    trapezoid("[\\", "\\]", NodeShape::ReverseTrapezoid)
}

/// `A["label"]`; the label is kept exactly as written between the quotes
pub fn quoted_rectangle_node<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    identifier_string()
        .then_ignore(optional_whitespace())
        .then_ignore(just('['))
        .then_ignore(optional_whitespace())
        .then(
            none_of('"')
                .repeated()
                .to_slice()
                .delimited_by(just('"'), just('"')),
        )
        .then_ignore(optional_whitespace())
        .then_ignore(just(']'))
        .map(|(id, text): (String, &str)| {
            let label = (!text.is_empty()).then(|| text.to_string());
            DiagramElement::Node(NodeDefinition::new(id, label, NodeShape::Rectangle))
        })
}

/// `A[label]`
pub fn unquoted_rectangle_node<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone
{
    identifier_string()
        .then_ignore(optional_whitespace())
        .then(
            none_of(']')
                .repeated()
                .at_least(1)
                .to_slice()
                .delimited_by(just('['), just(']')),
        )
        .map(|(id, text)| node(id, text, NodeShape::Rectangle))
}

/// `A`
pub fn bare_node<'src>() -> impl Parser<'src, &'src str, DiagramElement> + Clone {
    identifier_string().map(|id| DiagramElement::Node(NodeDefinition::bare(id)))
}
