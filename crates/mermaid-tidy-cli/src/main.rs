//! mermaid-tidy CLI - Normalize Mermaid flowcharts in Markdown files

mod cli;
mod colorizer;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    let mut app = cli::MermaidTidyApp::new();

    match app.run(cli_args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
