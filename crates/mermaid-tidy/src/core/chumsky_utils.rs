//! Shared chumsky parser utilities for line parsing
//!
//! Every line handed to these parsers has already been trimmed, so none of
//! them need to deal with newlines.

use chumsky::prelude::*;

/// Parse optional whitespace.
///
/// Uses explicit character matching to avoid the "repeated combinator making no progress"
/// issue that can occur with `chumsky::text::whitespace().repeated()`.
pub fn optional_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .ignored()
}

/// Parse required whitespace (at least one character).
pub fn whitespace_required<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .at_least(1)
        .ignored()
}

/// Parse an identifier: a run of alphanumeric characters or `_`.
///
/// Unlike `chumsky::text::ident`, leading digits are allowed (`1`, `2a`).
pub fn identifier<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice()
}

/// Parse an owned identifier.
pub fn identifier_string<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    identifier().map(str::to_string)
}

/// Match an ASCII keyword case-insensitively.
///
/// The keyword is not required to end at a word boundary; callers follow it
/// with whitespace or `end()` where that matters.
pub fn keyword<'src>(kw: &'static str) -> impl Parser<'src, &'src str, ()> + Clone {
    any()
        .repeated()
        .exactly(kw.chars().count())
        .to_slice()
        .filter(move |s: &&str| s.eq_ignore_ascii_case(kw))
        .ignored()
}

/// The remainder of the line, unparsed.
pub fn rest_of_line<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    any().repeated().to_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_whitespace() {
        let parser = optional_whitespace().then(just("test")).then_ignore(end());
        assert!(parser.parse("test").into_result().is_ok());
        assert!(parser.parse(" test").into_result().is_ok());
        assert!(parser.parse("\t test").into_result().is_ok());
    }

    #[test]
    fn test_whitespace_required() {
        let parser = just("a")
            .then(whitespace_required())
            .then(just("b"))
            .then_ignore(end());
        assert!(parser.parse("a b").into_result().is_ok());
        assert!(parser.parse("a \t b").into_result().is_ok());
        assert!(parser.parse("ab").into_result().is_err());
    }

    #[test]
    fn test_identifier() {
        let parser = identifier().then_ignore(end());
        assert_eq!(parser.parse("Node_1").into_result().ok(), Some("Node_1"));
        assert_eq!(parser.parse("1st").into_result().ok(), Some("1st"));
        assert!(parser.parse("A-B").into_result().is_err());
        assert!(parser.parse("").into_result().is_err());
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let parser = keyword("linkStyle").then_ignore(end());
        assert!(parser.parse("linkStyle").into_result().is_ok());
        assert!(parser.parse("LINKSTYLE").into_result().is_ok());
        assert!(parser.parse("linkstyle").into_result().is_ok());
        assert!(parser.parse("link").into_result().is_err());
    }

    #[test]
    fn test_keyword_prefix() {
        let parser = keyword("end").then(rest_of_line()).then_ignore(end());
        assert_eq!(parser.parse("endpoint").into_result().ok(), Some(((), "point")));
    }
}
