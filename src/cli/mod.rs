//! Command-line parsing for the sales analysis dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the statistics/chart code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_CONFIDENCE, DEFAULT_HYPOTHESIZED_MEAN};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sales",
    version,
    about = "Sales data analysis: descriptive + inferential statistics with charts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the table, statistics report, and ASCII charts.
    Report(EvalArgs),
    /// Write the current (possibly filtered) table to a CSV file.
    Export(ExportArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same underlying evaluation pipeline as `sales report`,
    /// but renders results in a terminal UI using Ratatui.
    Tui(EvalArgs),
}

/// Common options for evaluating a dataset.
#[derive(Debug, Parser, Clone)]
pub struct EvalArgs {
    /// Sales CSV to analyze (omit to use the built-in synthetic sample).
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Pick a CSV interactively from the current directory tree.
    #[arg(long)]
    pub pick: bool,

    /// Confidence level for the mean interval, in (0, 1).
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONFIDENCE)]
    pub confidence: f64,

    /// Hypothesized population mean for the one-sample t-test.
    #[arg(short = 'm', long = "mean", default_value_t = DEFAULT_HYPOTHESIZED_MEAN)]
    pub hypothesized_mean: f64,

    /// Keep only these categories (repeatable; no flag = keep all).
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// ASCII chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Skip the ASCII charts in report output.
    #[arg(long)]
    pub no_charts: bool,

    /// Skip the raw table in report output.
    #[arg(long)]
    pub no_table: bool,

    /// Also export the filtered table to this CSV path.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Also export the computed statistics to this JSON path.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,
}

/// Options for the `export` subcommand.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Sales CSV to load (omit to use the built-in synthetic sample).
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Pick a CSV interactively from the current directory tree.
    #[arg(long)]
    pub pick: bool,

    /// Keep only these categories (repeatable; no flag = keep all).
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "sales_data.csv")]
    pub out: PathBuf,
}
