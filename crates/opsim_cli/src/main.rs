//! Command-line entry point for OpSim summary loading.
//!
//! # Responsibility
//! - Parse arguments and logging settings.
//! - Drive `opsim_core` loads and snapshot writes, printing short reports.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use opsim_core::db::open_source;
use opsim_core::{
    default_log_level, init_logging, opsim_output_from_file, DatabaseUrl, FileFormat,
    OpSimOutput, Snapshot, SqliteOpSimSource, Subset,
};
use std::path::PathBuf;

/// Load OpSim pointing summaries filtered to WFD/DDF subsets.
#[derive(Parser, Debug)]
#[command(name = "opsim", version, about, long_about = None)]
struct Cli {
    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "OPSIM_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logs go to stderr when unset
    #[arg(long, env = "OPSIM_LOG_DIR", value_name = "DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a subset and print a summary of it
    Load {
        /// Database path or sqlite:// URL, or a snapshot file
        #[arg(value_name = "SOURCE")]
        source: String,

        /// One of _all|unique_all|ddf|wfd|combined
        #[arg(short, long, default_value = "combined")]
        subset: String,

        /// One of sqlite|snapshot|ascii
        #[arg(short, long, default_value = "sqlite")]
        format: String,
    },
    /// Capture the full Proposal and Summary tables into a JSON snapshot
    Snapshot {
        /// Database path or sqlite:// URL
        #[arg(value_name = "DATABASE")]
        database: String,

        /// Snapshot file to write
        #[arg(value_name = "OUT")]
        out: PathBuf,
    },
    /// List accepted subset names
    Subsets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        opsim_core::core_version()
    );

    match cli.command {
        Command::Load {
            source,
            subset,
            format,
        } => load(&source, &subset, &format),
        Command::Snapshot { database, out } => snapshot(&database, out),
        Command::Subsets => {
            for name in OpSimOutput::allowed_subsets() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn load(source: &str, subset: &str, format: &str) -> Result<()> {
    let format: FileFormat = format.parse()?;
    let subset: Subset = subset.parse()?;

    let output = match format {
        FileFormat::Sqlite => {
            let url = DatabaseUrl::parse(source)?;
            println!(" reading from database {url}");
            OpSimOutput::from_database_url(&url, subset)?
        }
        FileFormat::Snapshot | FileFormat::Ascii => {
            println!(" reading from {format} file {source}");
            opsim_output_from_file(source, format.as_str(), subset.as_str())?
        }
    };

    for line in report_lines(&output)? {
        println!("{line}");
    }
    Ok(())
}

/// `key=value` report printed after a load.
fn report_lines(output: &OpSimOutput) -> Result<Vec<String>> {
    let summary = output.summary();
    Ok(vec![
        format!("subset={}", output.subset()),
        format!("rows={}", summary.len()),
        // true when every obsHistID in the index appears once
        format!("unique_index={}", summary.is_unique()),
        format!("columns={}", summary.columns().join(",")),
        format!("proposals={}", output.proposal_table().len()),
        format!("prop_ids={}", serde_json::to_string(output.prop_ids())?),
    ])
}

fn snapshot(database: &str, out: PathBuf) -> Result<()> {
    let url = DatabaseUrl::parse(database)?;
    println!(" reading from database {url}");

    let conn = open_source(&url)?;
    let source = SqliteOpSimSource::new(&conn, url.as_str());
    let snapshot = Snapshot::capture(&source)?;
    snapshot
        .write(&out)
        .with_context(|| format!("failed to write snapshot to {}", out.display()))?;

    println!(
        "wrote {} summary rows and {} proposals to {}",
        snapshot.summary.len(),
        snapshot.proposals.len(),
        out.display()
    );
    Ok(())
}
