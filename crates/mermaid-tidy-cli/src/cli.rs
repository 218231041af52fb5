//! Command-line interface for the mermaid-tidy utility
//!
//! Formats or checks the Mermaid flowcharts inside Markdown files, or tidies a
//! single diagram body.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use crate::colorizer::colorize_diff;
use mermaid_tidy::core::logging::init_logging;
use mermaid_tidy::markdown::{collect_markdown_files, MarkdownProcessor, RunMode, RunSummary};
use mermaid_tidy::{tidy, StyleConfig};

/// mermaid-tidy - Normalize Mermaid flowcharts in Markdown files
#[derive(Parser)]
#[command(name = "mermaid-tidy")]
#[command(about = "Normalize Mermaid flowcharts embedded in Markdown into one canonical style")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// JSON file with style settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep custom classDef, class and linkStyle lines instead of the standard colors
    #[arg(long, global = true)]
    pub keep_custom_styles: bool,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite the Mermaid diagrams of Markdown files in place
    Format {
        /// Markdown files or directories to search
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Print a unified diff for each changed file
        #[arg(long)]
        diff: bool,

        /// When to use colors in diffs
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Fail if any diagram would change
    Check {
        /// Markdown files or directories to search
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Print a unified diff for each file that would change
        #[arg(long)]
        diff: bool,

        /// When to use colors in diffs
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Tidy a single diagram body
    Diagram {
        /// Input file containing the diagram (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the tidied diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct MermaidTidyApp {
    processor: MarkdownProcessor,
}

impl MermaidTidyApp {
    /// Create a new application instance with the standard style
    pub fn new() -> Self {
        Self::with_config(StyleConfig::default())
    }

    /// Create a new application instance with a style config
    pub fn with_config(config: StyleConfig) -> Self {
        Self {
            processor: MarkdownProcessor::with_config(config),
        }
    }

    fn build_config(path: Option<&PathBuf>, keep_custom_styles: bool) -> Result<StyleConfig> {
        let config = match path {
            Some(path) => StyleConfig::from_path(path)?,
            None => StyleConfig::default(),
        };
        Ok(if keep_custom_styles {
            config.with_enforcement(false)
        } else {
            config
        })
    }

    /// Run the application with the given CLI arguments.
    ///
    /// Returns `Ok(false)` when the run completed but should exit with a
    /// failure status.
    pub fn run(&mut self, cli: Cli) -> Result<bool> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("MERMAID_TIDY_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("MERMAID_TIDY_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("mermaid-tidy v{}", env!("CARGO_PKG_VERSION"));
        }

        let config = Self::build_config(cli.config.as_ref(), cli.keep_custom_styles)?;
        self.processor = MarkdownProcessor::with_config(config);

        match cli.command {
            Commands::Format {
                paths,
                dry_run,
                diff,
                color,
            } => self.format_command(&paths, dry_run, diff, color, cli.verbose),
            Commands::Check { paths, diff, color } => {
                self.check_command(&paths, diff, color, cli.verbose)
            }
            Commands::Diagram { input, output } => {
                self.diagram_command(input, output, cli.verbose)?;
                Ok(true)
            }
        }
    }

    /// Handle the format command
    fn format_command(
        &self,
        paths: &[PathBuf],
        dry_run: bool,
        diff: bool,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<bool> {
        let mode = if dry_run {
            RunMode::DryRun
        } else {
            RunMode::Format
        };
        let Some(summary) = self.process_files(paths, mode, diff, color, verbose)? else {
            return Ok(true);
        };
        Ok(!summary.has_errors())
    }

    /// Handle the check command
    fn check_command(
        &self,
        paths: &[PathBuf],
        diff: bool,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<bool> {
        let Some(summary) = self.process_files(paths, RunMode::Validate, diff, color, verbose)?
        else {
            return Ok(true);
        };

        if summary.is_conforming() {
            println!("\nValidation passed: all diagrams conform to style guide.");
            Ok(true)
        } else {
            println!("\nValidation failed: diagrams need formatting or have errors.");
            Ok(false)
        }
    }

    /// Process every Markdown file under `paths`, writing changes back in
    /// format mode. Returns `None` when there was nothing to process.
    fn process_files(
        &self,
        paths: &[PathBuf],
        mode: RunMode,
        diff: bool,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<Option<RunSummary>> {
        let files = collect_markdown_files(paths);
        if files.is_empty() {
            println!("No Markdown files found.");
            return Ok(None);
        }
        if verbose {
            eprintln!("Found {} Markdown file(s)", files.len());
        }

        let colorize = Self::should_colorize(color);
        let mut summary = RunSummary::new(mode);
        let mut stdout = io::stdout();

        for path in files {
            let mut report = self.processor.process_file(&path);

            if diff && report.is_changed() {
                let text = report.diff();
                let text = if colorize { colorize_diff(&text) } else { text };
                write!(stdout, "{}", text)?;
            }

            if mode == RunMode::Format && report.needs_write() {
                match report.write() {
                    Ok(()) if verbose => eprintln!("Formatted {}", path.display()),
                    Ok(()) => {}
                    Err(e) => report.document.errors.push(e),
                }
            }

            summary.record(&report);
        }

        writeln!(stdout, "\n{}", summary)?;
        if verbose {
            writeln!(stdout, "\n{}", summary.details())?;
        }
        stdout.flush()?;

        Ok(Some(summary))
    }

    /// Handle the diagram command
    fn diagram_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let outcome = tidy(&content, self.processor.config())?;

        if verbose {
            let status = if outcome.changed { "changed" } else { "unchanged" };
            eprintln!("Diagram {}", status);
        }

        self.write_output(output, &outcome.formatted)
    }

    /// Determine if we should colorize diffs based on color choice
    fn should_colorize(color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&std::io::stdout())
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout, always ending in a newline
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Get the processor (for testing)
    #[cfg(test)]
    pub fn processor(&self) -> &MarkdownProcessor {
        &self.processor
    }
}

impl Default for MermaidTidyApp {
    fn default() -> Self {
        Self::new()
    }
}
