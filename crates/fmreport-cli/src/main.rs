//! fmreport CLI - Team Performance Report Generator
//!
//! Populates a monthly team overview spreadsheet from a JSON payload and
//! embeds a bar chart of current vs previous month scores.
//!
//! ```text
//! fmreport <json_data> <output_path> [template_path]
//! ```
//!
//! `json_data` is either an inline JSON document or a path to one. On
//! success the tool prints `SUCCESS: <output_path>` followed by the path
//! itself and exits 0; on failure it prints `ERROR: <message>` to stderr
//! and exits 1.

use anyhow::Result;
use clap::Parser;
use fmreport_core::resolve_input;
use fmreport_render::ReportRenderer;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "fmreport")]
#[command(author, version, about = "Team performance report generator", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON payload, or path to a JSON file
    #[arg(value_name = "JSON_DATA")]
    data: Option<String>,

    /// Output spreadsheet path
    #[arg(value_name = "OUTPUT_PATH")]
    output: Option<PathBuf>,

    /// Optional template workbook
    #[arg(value_name = "TEMPLATE_PATH")]
    template: Option<PathBuf>,
}

fn run(data: &str, output: &Path, template: Option<&Path>) -> Result<PathBuf> {
    let input = resolve_input(data)?;
    tracing::debug!(
        team = %input.team_name,
        members = input.gp_data.len(),
        "payload resolved"
    );

    let mut renderer = ReportRenderer::new();
    if let Some(template) = template {
        renderer = renderer.template(template);
    }

    let path = renderer.save(&input, output)?;
    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the result contract
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let (Some(data), Some(output)) = (cli.data, cli.output) else {
        println!("Usage: fmreport <json_data> <output_path> [template_path]");
        std::process::exit(1);
    };

    match run(&data, &output, cli.template.as_deref()) {
        Ok(path) => {
            println!("SUCCESS: {}", path.display());
            println!("{}", path.display());
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
