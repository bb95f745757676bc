//! CLI argument definitions for the dimension classifier.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dimclass_output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "dimclass",
    version,
    about = "Classify INS statistical dimension labels and profile datasets",
    long_about = "Classify the dimension options of INS TEMPO datasets into typed fields \
                  (time, geography, gender, age, residence, unit, indicator) and derive a \
                  semantic profile and archetype for every dataset."
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

    /// Log output format (pretty for humans, json for machine parsing).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify every option occurrence of an input file and write the outputs.
    Run(RunArgs),

    /// Print the effective unit-of-measure table.
    Units(UnitsArgs),

    /// Print the dimension type assigned to dimension labels.
    Dispatch(DispatchArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// CSV of option occurrences (option_id, raw_label, dimension_label, matrix_code, dim_code).
    #[arg(long = "input", short = 'i', value_name = "CSV")]
    pub input: PathBuf,

    /// Directory receiving the output relations and the run manifest.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// File format of the two output relations.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: OutputFormatArg,

    /// Extra unit table layered over the built-in one (repeatable).
    #[arg(long = "units", value_name = "CSV")]
    pub units: Vec<PathBuf>,

    /// Classify and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Parse options on the current thread only.
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,

    /// Restrict the run to one dataset. Outputs are not written.
    #[arg(long = "matrix", value_name = "CODE")]
    pub matrix: Option<String>,

    /// Print the dispatch decision and parse result of every option.
    ///
    /// Classification runs synchronously. Requires --matrix.
    #[arg(long = "debug", requires = "matrix")]
    pub debug: bool,
}

#[derive(Parser)]
pub struct UnitsArgs {
    /// Extra unit table layered over the built-in one (repeatable).
    #[arg(long = "units", value_name = "CSV")]
    pub units: Vec<PathBuf>,
}

#[derive(Parser)]
pub struct DispatchArgs {
    /// Dimension labels to dispatch.
    #[arg(value_name = "LABEL", required = true)]
    pub labels: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Json => OutputFormat::Json,
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
