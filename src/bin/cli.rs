use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use rayon::prelude::*;
use schedule_gen::{LayoutConfig, LayoutOverrides, OutputFormat, ProcessOptions, process_file};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Turns plan files into reports and Gantt charts.
#[derive(Debug, Parser)]
#[command(name = "schedule-gen", version, about)]
struct Cli {
    /// Plan files to process. Outputs are written next to each input.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output formats, comma separated: text, csv, json, svg
    #[arg(short = 'o', long = "out", required = true, value_delimiter = ',')]
    formats: Vec<String>,

    /// JSON file with layout defaults.
    #[arg(long)]
    layout_config: Option<PathBuf>,

    /// Pixels per day on the chart timeline.
    #[arg(long)]
    day_width: Option<i32>,

    /// Canvas padding in pixels.
    #[arg(long)]
    padding: Option<i32>,

    /// Draw day lines only.
    #[arg(long)]
    no_hour_grid: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("schedule_gen={level},cli={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_layout(path: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading layout config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing layout config {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formats = cli
        .formats
        .iter()
        .map(|name| name.parse::<OutputFormat>())
        .collect::<Result<Vec<_>, _>>()?;

    let options = ProcessOptions {
        formats,
        layout: load_layout(cli.layout_config.as_deref())?,
        overrides: LayoutOverrides {
            pixels_per_day: cli.day_width,
            padding: cli.padding,
            hour_grid: cli.no_hour_grid.then_some(false),
        },
    };

    let results: Vec<(&PathBuf, Result<Vec<PathBuf>>)> = cli
        .files
        .par_iter()
        .map(|file| {
            let result = process_file(file, &options)
                .with_context(|| format!("processing {}", file.display()));
            (file, result)
        })
        .collect();

    let mut failed = 0;
    for (file, result) in results {
        match result {
            Ok(written) => {
                for path in written {
                    println!("Wrote {}", path.display());
                }
            }
            Err(err) => {
                error!(file = %file.display(), "{err:#}");
                eprintln!("Error: {err:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} file(s) failed", cli.files.len());
    }
    Ok(())
}
