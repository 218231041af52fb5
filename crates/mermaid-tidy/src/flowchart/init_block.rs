//! `%%{init: {...}}%%` block handling
//!
//! The block is cut out of the diagram text before line classification. Its
//! object is read by a tolerant literal parser that accepts the loose
//! JSON people actually write in Markdown: single quotes, bare keys,
//! `True`/`False`/`None` and trailing commas. Anything it cannot read
//! leaves the defaults in place.

use std::ops::Range;

use chumsky::prelude::*;
use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use super::InitConfig;
use crate::core::TidyError;

const MARKER: &str = "%%{init:";
const CLOSER: &str = "}%%";

/// Where an init block sits in the diagram text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitBlockSpan {
    /// The whole `%%{init: ... }%%` span
    pub range: Range<usize>,
    /// The `{...}` object inside it
    pub object: Range<usize>,
}

/// Locate the first well-formed init block.
///
/// A marker only counts when the next non-whitespace character opens an
/// object. The object ends at the earliest `}` that is followed, after
/// optional whitespace, by `}%%`.
pub fn find_init_block(text: &str) -> Option<InitBlockSpan> {
    let mut search_from = 0;
    while let Some(found) = text[search_from..].find(MARKER) {
        let start = search_from + found;
        let after_marker = start + MARKER.len();
        let rest = &text[after_marker..];
        let object_start = after_marker + (rest.len() - rest.trim_start().len());

        if text[object_start..].starts_with('{') {
            let mut close_from = object_start + 1;
            while let Some(offset) = text[close_from..].find('}') {
                let close = close_from + offset;
                let tail = text[close + 1..].trim_start();
                if tail.starts_with(CLOSER) {
                    let end = text.len() - tail.len() + CLOSER.len();
                    return Some(InitBlockSpan {
                        range: start..end,
                        object: object_start..close + 1,
                    });
                }
                close_from = close + 1;
            }
        }
        search_from = after_marker;
    }
    None
}

/// Cut the init block out of `text`.
///
/// Returns the parsed settings (defaults when the object is malformed) and
/// the remaining text. Text without an init block comes back unchanged.
pub fn extract_init_block(text: &str) -> (Option<InitConfig>, String) {
    let Some(span) = find_init_block(text) else {
        return (None, text.to_string());
    };

    let init = match parse_init_object(&text[span.object.clone()]) {
        Ok(init) => init,
        Err(e) => {
            debug!(error = %e, "Falling back to default init settings");
            InitConfig::default()
        }
    };

    let mut remaining = String::with_capacity(text.len() - span.range.len());
    remaining.push_str(&text[..span.range.start]);
    remaining.push_str(&text[span.range.end..]);
    (Some(init), remaining)
}

/// Read `theme` and `themeVariables` from an init object.
pub fn parse_init_object(object: &str) -> Result<InitConfig, TidyError> {
    let value = literal_parser()
        .padded()
        .then_ignore(end())
        .parse(object)
        .into_result()
        .map_err(|errors| {
            TidyError::init_block(format!("unreadable object ({} errors)", errors.len()))
        })?;

    let Value::Object(map) = value else {
        return Err(TidyError::init_block("init block is not an object"));
    };
    trace!(keys = map.len(), "Parsed init object");

    let mut init = InitConfig::default();
    if let Some(theme) = map.get("theme") {
        init.theme = scalar_string(theme);
    }
    match map.get("themeVariables") {
        Some(Value::Object(variables)) => {
            init.theme_variables = variables
                .iter()
                .map(|(key, value)| (key.clone(), scalar_string(value)))
                .collect();
        }
        Some(Value::Null) | None => {}
        Some(_) => return Err(TidyError::init_block("themeVariables is not an object")),
    }
    Ok(init)
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Tolerant literal parser producing a JSON value
pub fn literal_parser<'src>() -> impl Parser<'src, &'src str, Value> + Clone {
    recursive(|value| {
        let digits = any()
            .filter(|c: &char| c.is_ascii_digit())
            .repeated()
            .at_least(1);

        let number = just('-')
            .or_not()
            .then(digits.clone())
            .then(just('.').then(digits.clone()).or_not())
            .then(
                one_of("eE")
                    .then(one_of("+-").or_not())
                    .then(digits)
                    .or_not(),
            )
            .to_slice()
            .map(number_value);

        let literal = choice((
            just("true").or(just("True")).to(Value::Bool(true)),
            just("false").or(just("False")).to(Value::Bool(false)),
            just("null").or(just("None")).to(Value::Null),
        ));

        let string = quoted_string('"').or(quoted_string('\''));

        let key = string
            .clone()
            .or(chumsky::text::ident().map(str::to_string));

        let array = value
            .clone()
            .separated_by(just(',').padded())
            .allow_trailing()
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('['), just(']'))
            .map(Value::Array);

        let member = key.then_ignore(just(':').padded()).then(value);
        let object = member
            .separated_by(just(',').padded())
            .allow_trailing()
            .collect::<Vec<(String, Value)>>()
            .padded()
            .delimited_by(just('{'), just('}'))
            .map(|members| Value::Object(members.into_iter().collect::<Map<_, _>>()));

        choice((
            literal,
            number,
            string.map(Value::String),
            array,
            object,
        ))
        .padded()
    })
}

fn number_value(text: &str) -> Value {
    if let Ok(integer) = text.parse::<i64>() {
        return Value::Number(integer.into());
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.to_string()))
}

fn quoted_string<'src>(quote: char) -> impl Parser<'src, &'src str, String> + Clone {
    let unicode = just('u').ignore_then(
        any()
            .filter(|c: &char| c.is_ascii_hexdigit())
            .repeated()
            .exactly(4)
            .to_slice()
            .map(|hex: &str| {
                u32::from_str_radix(hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
            }),
    );

    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('/'),
        just('"'),
        just('\''),
        just('b').to('\x08'),
        just('f').to('\x0C'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
        unicode,
    )));

    none_of([quote, '\\'])
        .or(escape)
        .repeated()
        .collect::<String>()
        .delimited_by(just(quote), just(quote))
}
