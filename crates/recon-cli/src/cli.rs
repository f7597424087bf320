//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use recon_report::ExportFormat;

#[derive(Parser)]
#[command(
    name = "recon",
    version,
    about = "Manual reconciliation of an asset registry against a field survey",
    long_about = "Pair every row of an asset registry export with at most one row of a \
                  field survey export, save the pairings per project, and export the \
                  Paired / Registry-only / Survey-only partition."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values (names, notes) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML file overriding column rules, export labels and defaults.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the columns resolved for each role and key statistics.
    Inspect(TablesArgs),

    /// Rank survey rows for pending registry rows.
    Suggest(SuggestArgs),

    /// Pair rows interactively.
    Session(SessionArgs),

    /// Apply pairings from a file, then save and/or export.
    Apply(ApplyArgs),

    /// List projects with saved history.
    Projects(DbArgs),

    /// Show the saved history of a project.
    History(ProjectArgs),

    /// Delete the saved history of a project.
    Clear(ProjectArgs),
}

#[derive(Args)]
pub struct TablesArgs {
    /// Asset registry export (.csv, .xlsx, .xls, .ods).
    #[arg(value_name = "REGISTRY")]
    pub registry: PathBuf,

    /// Survey export (.csv, .xlsx, .xls, .ods).
    #[arg(value_name = "SURVEY")]
    pub survey: PathBuf,
}

#[derive(Args)]
pub struct DbArgs {
    /// History database (default from config, else ./history.db).
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,
}

#[derive(Args)]
pub struct ProjectArgs {
    #[arg(value_name = "PROJECT")]
    pub project: String,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub tables: TablesArgs,

    /// Suggestions per registry row.
    #[arg(long = "top-k", value_name = "N")]
    pub top_k: Option<usize>,

    /// Drop suggestions scoring below this (0-100).
    #[arg(long = "min-score", value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// Only this registry row.
    #[arg(long = "id", value_name = "REGISTRY_ID")]
    pub id: Option<String>,

    /// Restore claims from this project first.
    #[arg(long = "project", value_name = "PROJECT")]
    pub project: Option<String>,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Args)]
pub struct SessionArgs {
    #[command(flatten)]
    pub tables: TablesArgs,

    /// Project to restore from and save to.
    #[arg(long = "project", value_name = "PROJECT")]
    pub project: Option<String>,

    /// Operator name stored with saved rows.
    #[arg(long = "operator", value_name = "NAME")]
    pub operator: Option<String>,

    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub tables: TablesArgs,

    /// Two-column file of `registry_id,unique_key` lines; an empty key clears.
    #[arg(long = "pairs", value_name = "PATH")]
    pub pairs: PathBuf,

    /// Project to restore from before applying, and to save to.
    #[arg(long = "project", value_name = "PROJECT")]
    pub project: Option<String>,

    /// Append the resulting session to the project history.
    #[arg(long = "save", requires = "project")]
    pub save: bool,

    /// Operator name stored with saved rows.
    #[arg(long = "operator", value_name = "NAME")]
    pub operator: Option<String>,

    #[command(flatten)]
    pub db: DbArgs,

    /// Write export files after applying.
    #[arg(long = "export")]
    pub export: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Directory for export files.
    #[arg(long = "out", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Base file name for export files.
    #[arg(long = "name", value_name = "BASE", default_value = "reconciliation")]
    pub base_name: String,

    /// Export format.
    #[arg(long = "format", value_enum, default_value = "xlsx")]
    pub format: ExportFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Xlsx,
    Csv,
    Zip,
    All,
}

impl ExportFormatArg {
    pub fn formats(self) -> Vec<ExportFormat> {
        match self {
            ExportFormatArg::Xlsx => vec![ExportFormat::Xlsx],
            ExportFormatArg::Csv => vec![ExportFormat::Csv],
            ExportFormatArg::Zip => vec![ExportFormat::Zip],
            ExportFormatArg::All => ExportFormat::ALL.to_vec(),
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
