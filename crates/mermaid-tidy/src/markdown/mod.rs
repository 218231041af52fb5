//! Mermaid blocks inside Markdown documents
//!
//! Finds ```` ```mermaid ```` fenced blocks, tidies each one and splices the
//! result back into the document. A block that fails to tidy is left
//! exactly as it was and the failure is recorded; the other blocks in the
//! document are still processed.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{debug, info, span, warn, Level};

use crate::core::{StyleConfig, TidyError};
use crate::flowchart::tidy;

mod diff;
mod report;

pub use diff::*;
pub use report::*;

const FENCE_OPEN: &str = "```mermaid\n";
const FENCE_CLOSE: &str = "```";

/// One fenced Mermaid block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidBlock<'a> {
    /// From the opening fence through the closing fence
    pub range: Range<usize>,
    /// Text between the fences
    pub body: &'a str,
}

/// Every ```` ```mermaid ```` block in `document`, in order.
///
/// A block runs from an opening ```` ```mermaid ```` line to the next
/// ```` ``` ````. Blocks never overlap; an opening fence with no closing
/// fence is ignored.
pub fn find_mermaid_blocks(document: &str) -> Vec<MermaidBlock<'_>> {
    let mut blocks = Vec::new();
    let mut search_from = 0;

    while let Some(found) = document[search_from..].find(FENCE_OPEN) {
        let start = search_from + found;
        let body_start = start + FENCE_OPEN.len();
        let Some(body_len) = document[body_start..].find(FENCE_CLOSE) else {
            break;
        };
        let body_end = body_start + body_len;
        let end = body_end + FENCE_CLOSE.len();

        blocks.push(MermaidBlock {
            range: start..end,
            body: &document[body_start..body_end],
        });
        search_from = end;
    }

    blocks
}

/// Outcome of processing one document
#[derive(Debug, Default)]
pub struct DocumentReport {
    pub diagrams_found: usize,
    pub diagrams_changed: usize,
    /// The document with every successfully tidied block replaced
    pub formatted: String,
    pub errors: Vec<TidyError>,
}

impl DocumentReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Outcome of processing one file
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    /// File contents as read; empty when the read failed
    pub original: String,
    pub document: DocumentReport,
}

impl FileReport {
    /// Returns true if at least one diagram was reformatted
    pub fn is_changed(&self) -> bool {
        self.document.diagrams_changed > 0
    }

    /// Returns true if the file should be rewritten
    pub fn needs_write(&self) -> bool {
        self.is_changed() && !self.document.has_errors()
    }

    /// Write the formatted document back to its file
    pub fn write(&self) -> Result<(), TidyError> {
        std::fs::write(&self.path, &self.document.formatted).map_err(|source| {
            TidyError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Unified diff between the original and formatted document
    pub fn diff(&self) -> String {
        unified_diff(
            &self.original,
            &self.document.formatted,
            &self.path.display().to_string(),
        )
    }
}

/// Tidies every Mermaid block of a document
#[derive(Debug, Clone, Default)]
pub struct MarkdownProcessor {
    config: StyleConfig,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StyleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Tidy all blocks in `document`
    pub fn process_document(&self, document: &str) -> DocumentReport {
        let blocks = find_mermaid_blocks(document);
        let mut report = DocumentReport {
            diagrams_found: blocks.len(),
            ..DocumentReport::default()
        };

        let mut formatted = String::with_capacity(document.len());
        let mut copied_to = 0;

        for block in &blocks {
            formatted.push_str(&document[copied_to..block.range.start]);
            copied_to = block.range.end;

            match tidy(block.body, &self.config) {
                Ok(outcome) => {
                    if outcome.changed {
                        report.diagrams_changed += 1;
                    }
                    formatted.push_str(FENCE_OPEN);
                    formatted.push_str(&outcome.formatted);
                    formatted.push('\n');
                    formatted.push_str(FENCE_CLOSE);
                }
                Err(e) => {
                    warn!(offset = block.range.start, error = %e, "Leaving diagram untouched");
                    report
                        .errors
                        .push(TidyError::diagram_failed(block.range.start, e));
                    formatted.push_str(&document[block.range.clone()]);
                }
            }
        }
        formatted.push_str(&document[copied_to..]);

        report.formatted = formatted;
        report
    }

    /// Read and tidy one file. Read failures are recorded in the report.
    pub fn process_file(&self, path: impl AsRef<Path>) -> FileReport {
        let path = path.as_ref();
        let span = span!(Level::INFO, "process_file", path = %path.display());
        let _enter = span.enter();

        let original = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) => {
                warn!(error = %source, "Could not read file");
                return FileReport {
                    path: path.to_path_buf(),
                    original: String::new(),
                    document: DocumentReport {
                        errors: vec![TidyError::Read {
                            path: path.to_path_buf(),
                            source,
                        }],
                        ..DocumentReport::default()
                    },
                };
            }
        };

        let document = self.process_document(&original);
        info!(
            diagrams = document.diagrams_found,
            changed = document.diagrams_changed,
            errors = document.errors.len(),
            "Processed file"
        );
        FileReport {
            path: path.to_path_buf(),
            original,
            document,
        }
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

fn walk(dir: &Path, found: &mut BTreeSet<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, found);
        } else if is_markdown(&path) {
            found.insert(path);
        }
    }
}

/// Markdown files named by or found under `paths`, sorted and deduplicated.
///
/// Files are taken as-is when they carry a `.md` or `.markdown` extension
/// (any case); directories are searched recursively. Paths that do not
/// exist are skipped.
pub fn collect_markdown_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for path in paths {
        if path.is_file() {
            if is_markdown(path) {
                found.insert(path.clone());
            } else {
                debug!(path = %path.display(), "Not a Markdown file");
            }
        } else if path.is_dir() {
            walk(path, &mut found);
        } else {
            warn!(path = %path.display(), "Path does not exist");
        }
    }
    found.into_iter().collect()
}
