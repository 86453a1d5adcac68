//! Command-line interface over JSON report files.
//!
//! Each subcommand is one whole-batch, run-to-completion operation: load a
//! report, act on it, write the result. Logging goes through `tracing`; the
//! `RUST_LOG` env filter is respected, `--verbose` lowers the default level.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::analyze::flag_records;
use crate::bulk::apply_to_selection;
use crate::export::{self, TriageVariant};
use crate::persist::{ReportStore, read_report};
use crate::store::RecordStore;
use crate::triage::{SortToggles, rank};

#[derive(Debug, Parser)]
#[command(
    name = "extriage",
    version,
    about = "Review, bulk-edit, and triage-export batches of extraction records"
)]
pub struct Cli {
    /// Verbose logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export records missing reviewer-chosen fields as a prioritized CSV.
    Triage {
        /// Report file to load.
        input: PathBuf,

        /// Fields that should be present, comma-separated.
        #[arg(long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// Rank by missing-field count, descending.
        #[arg(long)]
        sort_missing: bool,

        /// Rank by confidence, descending; applied after the missing-count
        /// sort, so with both flags this is the effective primary order.
        #[arg(long)]
        sort_confidence: bool,

        /// Keep only the first N ranked rows.
        #[arg(long)]
        top: Option<usize>,

        /// Include the confidence column.
        #[arg(long)]
        preview: bool,

        /// Write the CSV here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Set one field to one value across a selection of records.
    ///
    /// The value replaces whatever each selected record held under the
    /// field — this is a destructive bulk set, not a merge.
    BulkSet {
        /// Report file to load.
        input: PathBuf,

        /// Record indices to edit, comma-separated, 0-based.
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<usize>,

        /// Field to set.
        #[arg(long)]
        field: String,

        /// New value, parsed as JSON; bare words become strings.
        #[arg(long)]
        value: String,

        /// Write the edited report here instead of saving in place (in-place
        /// saves write a timestamped backup first).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Dump the whole report in a transfer format.
    Dump {
        /// Report file to load.
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = DumpFormat::Json)]
        format: DumpFormat,

        /// Write here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Inspect a report's saved backups.
    Backups {
        #[command(subcommand)]
        command: BackupsCommand,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    Json,
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum BackupsCommand {
    /// List backup names, newest first.
    List {
        /// Report file the backups belong to.
        report: PathBuf,
    },
    /// Print a backup's contents to stdout.
    Show {
        /// Report file the backup belongs to.
        report: PathBuf,
        /// Backup name, as printed by `backups list`.
        name: String,
    },
}

/// Install the tracing subscriber. `--verbose` lowers the default level to
/// debug; an explicit `RUST_LOG` wins either way.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Triage {
            input,
            fields,
            sort_missing,
            sort_confidence,
            top,
            preview,
            out,
        } => triage_command(
            input,
            fields,
            SortToggles {
                by_missing_count: sort_missing,
                by_confidence: sort_confidence,
            },
            top,
            preview,
            out,
        ),
        Commands::BulkSet {
            input,
            select,
            field,
            value,
            out,
        } => bulk_set_command(input, select, field, value, out),
        Commands::Dump { input, format, out } => dump_command(input, format, out),
        Commands::Backups { command } => backups_command(command),
    }
}

fn load_store(input: &PathBuf) -> Result<RecordStore> {
    let batch = read_report(input)
        .with_context(|| format!("failed to read report {}", input.display()))?;
    let mut store = RecordStore::new();
    let count = store
        .load_json(batch)
        .with_context(|| format!("failed to load report {}", input.display()))?;
    tracing::debug!(count, input = %input.display(), "report loaded");
    Ok(store)
}

fn triage_command(
    input: PathBuf,
    fields: Vec<String>,
    toggles: SortToggles,
    top: Option<usize>,
    preview: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let store = load_store(&input)?;

    let flagged = flag_records(store.all(), &fields);
    if flagged.is_empty() {
        bail!("no records are missing any of the requested fields");
    }

    let mut ranked = rank(flagged, toggles);
    if let Some(n) = top {
        ranked.truncate(n);
    }

    let variant = if preview {
        TriageVariant::Preview
    } else {
        TriageVariant::Basic
    };
    let csv = export::triage_csv(&ranked, variant);

    match out {
        Some(path) => {
            fs::write(&path, &csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "{} {} flagged records to {}",
                "wrote".green(),
                ranked.len(),
                path.display()
            );
        }
        None => println!("{csv}"),
    }
    Ok(())
}

fn bulk_set_command(
    input: PathBuf,
    select: Vec<usize>,
    field: String,
    value: String,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut store = load_store(&input)?;

    for index in &select {
        store
            .select(*index)
            .with_context(|| format!("cannot select record {index}"))?;
    }

    let selection: BTreeSet<usize> = store.selection().clone();
    let value: serde_json::Value =
        serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
    let count = apply_to_selection(&mut store, &selection, &field, &value)?;

    match out {
        Some(path) => {
            let body = export::full_batch_json(store.all())?;
            fs::write(&path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "{} {field} on {count} records, edited report at {}",
                "set".green(),
                path.display()
            );
        }
        None => {
            let backup = ReportStore::new(&input).save(store.all())?;
            println!(
                "{} {field} on {count} records, saved in place (backup {backup})",
                "set".green()
            );
        }
    }
    Ok(())
}

fn dump_command(input: PathBuf, format: DumpFormat, out: Option<PathBuf>) -> Result<()> {
    let store = load_store(&input)?;
    let body = match format {
        DumpFormat::Json => export::full_batch_json(store.all())?,
        DumpFormat::Csv => export::full_batch_csv(store.all())?,
    };
    match out {
        Some(path) => {
            fs::write(&path, &body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "{} {} records to {}",
                "dumped".green(),
                store.len(),
                path.display()
            );
        }
        None => println!("{body}"),
    }
    Ok(())
}

fn backups_command(command: BackupsCommand) -> Result<()> {
    match command {
        BackupsCommand::List { report } => {
            let names = ReportStore::new(&report).list_backups()?;
            if names.is_empty() {
                println!("no backups for {}", report.display());
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
        BackupsCommand::Show { report, name } => {
            let bytes = ReportStore::new(&report).read_backup(&name)?;
            std::io::stdout().write_all(&bytes)?;
        }
    }
    Ok(())
}
