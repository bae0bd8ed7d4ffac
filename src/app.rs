//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - runs the load -> prepare -> KPI pipeline
//! - prints reports/plots or starts the TUI
//! - writes exports

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::cli::{ChartArgs, Command, ExportArgs, PlotArgs, SummaryArgs, TuiArgs};
use crate::error::AppError;
use crate::telemetry::LogTarget;

pub mod pipeline;

/// Entry point for the `salesdash` binary.
pub fn run() -> Result<(), AppError> {
    // Env-backed flags (e.g. SALESDASH_CURRENCY_UNIT) may live in `.env`.
    dotenvy::dotenv().ok();

    // We want `salesdash` and `salesdash -f sales.csv` to behave like `salesdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match &cli.command {
        Command::Tui(args) => match &args.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None => LogTarget::Discard,
        },
        _ => LogTarget::Stderr,
    };
    crate::telemetry::init(cli.verbose, target)?;

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Export(args) => handle_export(args),
        Command::Chart(args) => handle_chart(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let config = args.dashboard.to_config();
    let run = pipeline::run_dashboard(&config)?;

    println!("{}", crate::report::format_run_summary(&run.prepared, &run.kpis, &config));

    if !args.no_plot {
        let chart = run.chart(&config);
        println!("{}", crate::plot::render_line_chart(&chart.line, args.width, args.height));
        println!("{}", crate::plot::render_bar_chart(&chart.bar, args.width, args.height));
    }

    if !args.no_table {
        println!("{}", crate::report::format_data_table(run.dataset(), config.show_index));
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = args.dashboard.to_config();
    let run = pipeline::run_dashboard(&config)?;

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(crate::io::export::default_export_file_name(chrono::Local::now())));
    crate::io::export::write_dataset_csv(&path, run.dataset(), config.show_index)?;

    println!("Wrote {} row(s) to {}", run.dataset().len(), path.display());
    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let config = args.dashboard.to_config();
    let run = pipeline::run_dashboard(&config)?;

    crate::io::chart::write_chart_json(&args.output, &run.chart(&config))?;
    println!("Wrote chart configuration to {}", args.output.display());
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let chart = crate::io::chart::read_chart_json(&args.chart)?;
    info!(path = %args.chart.display(), theme = ?chart.theme, "plotting saved chart");

    println!("{}", crate::plot::render_line_chart(&chart.line, args.width, args.height));
    println!("{}", crate::plot::render_bar_chart(&chart.bar, args.width, args.height));
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(args.dashboard.to_config())
}

/// Rewrite argv so `salesdash` defaults to `salesdash tui`.
///
/// Rules:
/// - `salesdash`                      -> `salesdash tui`
/// - `salesdash -f sales.csv ...`     -> `salesdash tui -f sales.csv ...`
/// - `salesdash -v summary ...`       -> unchanged (`-v` is global)
/// - `salesdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    // Leading verbosity flags are global; look past them for the subcommand.
    let first = argv
        .iter()
        .skip(1)
        .position(|a| !is_verbosity_flag(a))
        .map(|i| i + 1);
    let Some(pos) = first else {
        argv.push("tui".to_string());
        return argv;
    };
    let arg = argv[pos].as_str();

    let is_top_level_help_or_version = matches!(arg, "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg, "summary" | "export" | "chart" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg.starts_with('-') {
        argv.insert(pos, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

/// `-v`, `-vv`, ... or `--verbose`.
fn is_verbosity_flag(arg: &str) -> bool {
    if arg == "--verbose" {
        return true;
    }
    arg.strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c == 'v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(args(&["salesdash"])), args(&["salesdash", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["salesdash", "-f", "a.csv"])),
            args(&["salesdash", "tui", "-f", "a.csv"])
        );
    }

    #[test]
    fn verbosity_before_tui_flags_stays_global() {
        assert_eq!(
            rewrite_args(args(&["salesdash", "-v", "-f", "a.csv"])),
            args(&["salesdash", "-v", "tui", "-f", "a.csv"])
        );
        assert_eq!(rewrite_args(args(&["salesdash", "-vv"])), args(&["salesdash", "-vv", "tui"]));
    }

    #[test]
    fn rewritten_verbose_summary_parses() {
        let cli = crate::cli::Cli::try_parse_from(rewrite_args(args(&["salesdash", "-v", "summary", "-f", "a.csv"])))
            .expect("parse");
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Command::Summary(_)));
    }

    #[test]
    fn subcommands_and_help_untouched() {
        for v in [
            &["salesdash", "summary", "-f", "a.csv"][..],
            &["salesdash", "--help"][..],
            &["salesdash", "-V"][..],
            &["salesdash", "-v", "summary"][..],
            &["salesdash", "-vv", "--verbose", "export", "-f", "a.csv"][..],
        ] {
            assert_eq!(rewrite_args(args(v)), args(v));
        }
    }
}
