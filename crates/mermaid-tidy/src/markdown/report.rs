//! Run summaries across many files

use std::fmt;
use std::path::PathBuf;

use super::FileReport;

const RULE_WIDTH: usize = 60;

/// What a run did with the files it tidied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Rewrite changed files
    #[default]
    Format,
    /// Report what would change without writing
    DryRun,
    /// Fail when anything would change
    Validate,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Format => write!(f, "format"),
            RunMode::DryRun => write!(f, "dry-run"),
            RunMode::Validate => write!(f, "validate"),
        }
    }
}

/// Per-file line of the detailed summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub diagrams: usize,
    pub changed: bool,
    pub errors: Vec<String>,
}

/// Totals over every processed file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: RunMode,
    pub files_scanned: usize,
    pub files_with_diagrams: usize,
    pub files_changed: usize,
    pub diagrams_found: usize,
    pub diagrams_reformatted: usize,
    pub errors: usize,
    pub files: Vec<FileSummary>,
}

impl RunSummary {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Add one file's results to the totals
    pub fn record(&mut self, report: &FileReport) {
        let document = &report.document;
        self.files_scanned += 1;
        if document.diagrams_found > 0 {
            self.files_with_diagrams += 1;
        }
        if report.is_changed() {
            self.files_changed += 1;
        }
        self.diagrams_found += document.diagrams_found;
        self.diagrams_reformatted += document.diagrams_changed;
        self.errors += document.errors.len();
        self.files.push(FileSummary {
            path: report.path.clone(),
            diagrams: document.diagrams_found,
            changed: report.is_changed(),
            errors: document.errors.iter().map(ToString::to_string).collect(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Nothing would change and nothing failed
    pub fn is_conforming(&self) -> bool {
        self.diagrams_reformatted == 0 && self.errors == 0
    }

    /// Per-file breakdown for files that contain diagrams
    pub fn details(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = format!("{}\nDetails by file:\n{}\n", rule, rule);
        for file in self.files.iter().filter(|file| file.diagrams > 0) {
            let status = if file.changed { "changed" } else { "ok" };
            out.push_str(&format!(
                "  {}: {} diagram(s), {}\n",
                file.path.display(),
                file.diagrams,
                status
            ));
            for error in &file.errors {
                out.push_str(&format!("    ERROR: {}\n", error));
            }
        }
        out
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Mermaid Formatting Summary ({})", self.mode)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Files scanned:        {}", self.files_scanned)?;
        writeln!(f, "Files with diagrams:  {}", self.files_with_diagrams)?;
        writeln!(f, "Files with changes:   {}", self.files_changed)?;
        writeln!(f, "Diagrams found:       {}", self.diagrams_found)?;
        write!(f, "Diagrams reformatted: {}", self.diagrams_reformatted)?;
        if self.errors > 0 {
            write!(f, "\nErrors:               {}", self.errors)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TidyError;
    use crate::markdown::DocumentReport;

    fn report(path: &str, found: usize, changed: usize, errors: usize) -> FileReport {
        FileReport {
            path: PathBuf::from(path),
            original: String::new(),
            document: DocumentReport {
                diagrams_found: found,
                diagrams_changed: changed,
                formatted: String::new(),
                errors: (0..errors)
                    .map(|i| TidyError::diagram_failed(i * 10, "bad"))
                    .collect(),
            },
        }
    }

    #[test]
    fn test_run_mode_display() {
        assert_eq!(RunMode::Format.to_string(), "format");
        assert_eq!(RunMode::DryRun.to_string(), "dry-run");
        assert_eq!(RunMode::Validate.to_string(), "validate");
    }

    #[test]
    fn test_totals() {
        let mut summary = RunSummary::new(RunMode::Validate);
        summary.record(&report("a.md", 2, 1, 0));
        summary.record(&report("b.md", 0, 0, 0));
        summary.record(&report("c.md", 3, 0, 1));

        assert_eq!(summary.files_scanned, 3);
        assert_eq!(summary.files_with_diagrams, 2);
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.diagrams_found, 5);
        assert_eq!(summary.diagrams_reformatted, 1);
        assert_eq!(summary.errors, 1);
        assert!(!summary.is_conforming());
    }

    #[test]
    fn test_banner() {
        let mut summary = RunSummary::new(RunMode::DryRun);
        summary.record(&report("a.md", 1, 0, 0));
        let banner = summary.to_string();
        assert!(banner.starts_with(&"=".repeat(60)));
        assert!(banner.contains("Mermaid Formatting Summary (dry-run)"));
        assert!(banner.contains("Files scanned:        1"));
        assert!(!banner.contains("Errors:"));
        assert!(summary.is_conforming());
    }

    #[test]
    fn test_banner_lists_errors() {
        let mut summary = RunSummary::new(RunMode::Format);
        summary.record(&report("a.md", 1, 0, 2));
        assert!(summary.to_string().ends_with("Errors:               2"));
    }

    #[test]
    fn test_details_skip_files_without_diagrams() {
        let mut summary = RunSummary::new(RunMode::Format);
        summary.record(&report("a.md", 1, 1, 1));
        summary.record(&report("empty.md", 0, 0, 0));
        let details = summary.details();
        assert!(details.contains("a.md: 1 diagram(s), changed"));
        assert!(details.contains("ERROR: Failed to format diagram at position 0: bad"));
        assert!(!details.contains("empty.md"));
    }
}
