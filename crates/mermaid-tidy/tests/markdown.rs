//! Document-level tests: block replacement, failures and file handling

use std::fs;
use std::path::PathBuf;

use mermaid_tidy::core::{StyleConfig, TidyError};
use mermaid_tidy::markdown::{
    collect_markdown_files, find_mermaid_blocks, MarkdownProcessor, RunMode, RunSummary,
};
use tempfile::tempdir;

const GUIDE: &str = "# Guide

Some prose.

```mermaid
graph LR
A-->B
```

More prose.

```mermaid
flowchart TB
  X
```
";

fn passthrough() -> MarkdownProcessor {
    MarkdownProcessor::with_config(StyleConfig::passthrough())
}

#[test]
fn test_blocks_are_replaced_and_counted() {
    let report = passthrough().process_document(GUIDE);
    assert_eq!(report.diagrams_found, 2);
    assert_eq!(report.diagrams_changed, 1);
    assert!(report.errors.is_empty());
    assert!(report.formatted.contains("```mermaid\ngraph LR\n  A --> B\n```"));
    assert!(report.formatted.contains("```mermaid\nflowchart TB\n  X\n```"));
    assert!(report.formatted.starts_with("# Guide\n\nSome prose.\n\n"));
    assert!(report.formatted.ends_with("```\n"));
}

#[test]
fn test_processing_twice_changes_nothing() {
    let processor = MarkdownProcessor::new();
    let first = processor.process_document(GUIDE);
    let second = processor.process_document(&first.formatted);
    assert_eq!(second.diagrams_changed, 0);
    assert_eq!(second.formatted, first.formatted);
}

/// Every block re-parses with an extra node, so none survives the check
fn failing() -> MarkdownProcessor {
    MarkdownProcessor::with_config(StyleConfig {
        canonical_init_block: Some("Injected".to_string()),
        ..StyleConfig::passthrough()
    })
}

#[test]
fn test_failed_diagram_is_left_untouched() {
    let document = "Intro\n\n```mermaid\nA-->B\n```\n\n```mermaid\nB-->C\n```\n";
    let report = failing().process_document(document);

    assert_eq!(report.diagrams_found, 2);
    assert_eq!(report.diagrams_changed, 0);
    assert_eq!(report.errors.len(), 2);
    let offsets: Vec<usize> = report
        .errors
        .iter()
        .map(|error| match error {
            TidyError::DiagramFailed { offset, reason } => {
                assert!(reason.contains("Round-trip"));
                *offset
            }
            other => panic!("unexpected error: {:?}", other),
        })
        .collect();
    assert_eq!(offsets[0], "Intro\n\n".len());
    assert!(offsets[1] > offsets[0]);
    assert_eq!(report.formatted, document);
}

#[test]
fn test_quote_only_label_is_formatted_not_failed() {
    let document = "```mermaid\nA[\"]\n```\n\n```mermaid\nB-->C\n```\n";
    let report = passthrough().process_document(document);

    assert!(report.errors.is_empty());
    assert_eq!(report.diagrams_changed, 2);
    assert!(report.formatted.starts_with("```mermaid\nflowchart TB\n  A\n```\n"));
    assert!(report.formatted.contains("```mermaid\nflowchart TB\n  B --> C\n```"));
}

#[test]
fn test_only_mermaid_fences_are_touched() {
    let document = "```rust\nA-->B\n```\n```Mermaid\nA-->B\n```\n";
    assert!(find_mermaid_blocks(document).is_empty());
    let report = MarkdownProcessor::new().process_document(document);
    assert_eq!(report.formatted, document);
}

#[test]
fn test_process_file_and_write_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("guide.md");
    fs::write(&path, GUIDE).unwrap();

    let report = passthrough().process_file(&path);
    assert_eq!(report.original, GUIDE);
    assert!(report.is_changed());
    assert!(report.needs_write());

    let diff = report.diff();
    assert!(diff.starts_with(&format!("--- a/{}\n", path.display())));
    assert!(diff.contains("-A-->B\n"));
    assert!(diff.contains("+  A --> B\n"));

    report.write().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), report.document.formatted);
}

#[test]
fn test_missing_file_is_recorded() {
    let dir = tempdir().unwrap();
    let report = MarkdownProcessor::new().process_file(dir.path().join("gone.md"));
    assert_eq!(report.document.errors.len(), 1);
    assert!(matches!(report.document.errors[0], TidyError::Read { .. }));
    assert!(!report.needs_write());
}

#[test]
fn test_collect_markdown_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("docs/nested")).unwrap();
    fs::write(root.join("README.md"), "").unwrap();
    fs::write(root.join("docs/guide.markdown"), "").unwrap();
    fs::write(root.join("docs/nested/DEEP.MD"), "").unwrap();
    fs::write(root.join("docs/notes.txt"), "").unwrap();

    let files = collect_markdown_files(&[
        root.to_path_buf(),
        root.join("README.md"),
        root.join("docs/notes.txt"),
        root.join("missing"),
    ]);

    let expected: Vec<PathBuf> = vec![
        root.join("README.md"),
        root.join("docs/guide.markdown"),
        root.join("docs/nested/DEEP.MD"),
    ];
    assert_eq!(files, expected);
}

#[test]
fn test_summary_over_files() {
    let dir = tempdir().unwrap();
    let changed = dir.path().join("a.md");
    let clean = dir.path().join("b.md");
    fs::write(&changed, GUIDE).unwrap();
    fs::write(&clean, "no diagrams here\n").unwrap();

    let processor = passthrough();
    let mut summary = RunSummary::new(RunMode::DryRun);
    for path in collect_markdown_files(&[dir.path().to_path_buf()]) {
        summary.record(&processor.process_file(path));
    }

    assert_eq!(summary.files_scanned, 2);
    assert_eq!(summary.files_with_diagrams, 1);
    assert_eq!(summary.files_changed, 1);
    assert_eq!(summary.diagrams_found, 2);
    assert_eq!(summary.diagrams_reformatted, 1);
    assert!(!summary.is_conforming());
    assert!(summary.to_string().contains("(dry-run)"));
}
