//! Tests for logging initialization
//!
//! Only one global subscriber can be installed per process, so most of these
//! only check that initialization never panics.

use mermaid_tidy::core::logging::{init_logging, LogFormat};
use mermaid_tidy::tidy;
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_init_logging_with_levels() {
    for level in ["trace", "debug", "info", "warn", "error", "off"] {
        let _ = init_logging(Some(level), Some("compact"));
    }
}

#[test]
fn test_init_logging_with_formats() {
    for name in LogFormat::variants() {
        let _ = init_logging(Some("info"), Some(*name));
    }
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_tidy_with_trace_logging() {
    let _ = init_logging(Some("trace"), Some("compact"));
    let outcome = tidy(
        "graph LR\nsubgraph S\nA --> B\nend\nend\n???",
        &Default::default(),
    )
    .unwrap();
    assert!(outcome.formatted.contains("\n  ???"));
}
