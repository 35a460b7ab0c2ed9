//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data source (sample or CSV)
//! - runs the evaluation pipeline
//! - prints reports/charts
//! - writes optional exports

use std::collections::BTreeSet;

use clap::Parser;

use crate::cli::{Command, EvalArgs, ExportArgs};
use crate::domain::{DataSource, EvalConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `sales` and `sales -c 0.9` to behave like `sales tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_report(args: EvalArgs) -> Result<(), AppError> {
    let config = eval_config_from_args(&args)?;
    let run = pipeline::evaluate_once(&config)?;

    println!("{}", crate::report::format_run_summary(&run.table, &config));
    if !args.no_table {
        println!("{}", crate::report::format_table(&run.table));
    }
    println!("{}", crate::report::format_descriptive(&run.summary));
    println!("{}", crate::report::format_inference(&run.inference));

    if !args.no_charts {
        println!("{}", crate::plot::render_histogram(&run.histogram, args.width));
        println!("{}", crate::plot::render_boxplot(&run.boxplot, args.width));
        println!("{}", crate::plot::render_bars(&run.bars, args.width));
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_table_csv(path, &run.table)?;
    }
    if let Some(path) = &args.export_summary {
        crate::io::summary::write_summary_json(path, &run, &config)?;
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let source = resolve_source(&args.file, args.pick)?;
    let config = EvalConfig {
        source,
        category_filter: args.categories.iter().cloned().collect(),
        ..EvalConfig::default()
    };

    let run = pipeline::evaluate_once(&config)?;
    crate::io::export::write_table_csv(&args.out, &run.table)?;
    println!("Wrote {} row(s) to {}", run.table.len(), args.out.display());
    Ok(())
}

fn handle_tui(args: EvalArgs) -> Result<(), AppError> {
    let config = eval_config_from_args(&args)?;
    crate::tui::run(config)
}

/// Build the pipeline config from common CLI flags.
pub fn eval_config_from_args(args: &EvalArgs) -> Result<EvalConfig, AppError> {
    let source = resolve_source(&args.file, args.pick)?;
    let category_filter: BTreeSet<String> = args.categories.iter().cloned().collect();

    Ok(EvalConfig {
        source,
        category_filter,
        confidence_level: args.confidence,
        hypothesized_mean: args.hypothesized_mean,
    })
}

fn resolve_source(
    file: &Option<std::path::PathBuf>,
    pick: bool,
) -> Result<DataSource, AppError> {
    if let Some(path) = file {
        return Ok(DataSource::File(crate::cli::picker::validate_csv_path(path)?));
    }
    if pick {
        return Ok(DataSource::File(crate::cli::picker::prompt_for_csv_path()?));
    }
    Ok(DataSource::Sample)
}

/// Rewrite argv so `sales` defaults to `sales tui`.
///
/// Rules:
/// - `sales`                     -> `sales tui`
/// - `sales -c 0.9 ...`          -> `sales tui -c 0.9 ...`
/// - `sales --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["sales"])), args(&["sales", "tui"]));
        assert_eq!(
            rewrite_args(args(&["sales", "-c", "0.9"])),
            args(&["sales", "tui", "-c", "0.9"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["sales", "report"])),
            args(&["sales", "report"])
        );
        assert_eq!(
            rewrite_args(args(&["sales", "--help"])),
            args(&["sales", "--help"])
        );
    }
}
