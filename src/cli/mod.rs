//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data preparation and KPI code.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::{ColumnAliases, DashboardConfig, Theme, DEFAULT_BAR_WIDTH_PCT, DEFAULT_CURRENCY_UNIT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salesdash", version, about = "Monthly sales dashboard (KPIs, charts, CSV export)")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print KPI cards, ASCII charts and the data table.
    Summary(SummaryArgs),
    /// Write the prepared dataset back to CSV (UTF-8 with BOM).
    Export(ExportArgs),
    /// Write the chart display configuration as JSON.
    Chart(ChartArgs),
    /// Plot a previously exported chart JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// Uses the same load -> prepare -> KPI pipeline as `summary`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Options shared by every command that loads a dataset.
#[derive(Debug, Parser, Clone)]
pub struct DashboardArgs {
    /// CSV with period, value, reference and change columns. Omit to use the built-in sample.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Chart theme.
    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    pub theme: Theme,

    /// Draw straight line segments instead of a spline.
    #[arg(long)]
    pub no_smooth: bool,

    /// Bar width in percent of the category slot.
    #[arg(long, default_value_t = DEFAULT_BAR_WIDTH_PCT, value_parser = clap::value_parser!(u8).range(20..=100))]
    pub bar_width: u8,

    /// Show (and export) the row index column.
    #[arg(long)]
    pub index: bool,

    /// Suffix appended to currency amounts.
    #[arg(long, env = "SALESDASH_CURRENCY_UNIT", default_value = DEFAULT_CURRENCY_UNIT)]
    pub currency_unit: String,

    /// Header name for the period column (tried before the built-in aliases).
    #[arg(long, value_name = "HEADER")]
    pub period_col: Option<String>,

    /// Header name for the sales value column.
    #[arg(long, value_name = "HEADER")]
    pub value_col: Option<String>,

    /// Header name for the prior-year value column.
    #[arg(long, value_name = "HEADER")]
    pub reference_col: Option<String>,

    /// Header name for the YoY change (%) column.
    #[arg(long, value_name = "HEADER")]
    pub change_col: Option<String>,
}

impl DashboardArgs {
    pub fn to_config(&self) -> DashboardConfig {
        DashboardConfig {
            input: self.file.clone(),
            theme: self.theme,
            smooth_line: !self.no_smooth,
            bar_width_pct: self.bar_width,
            show_index: self.index,
            currency_unit: self.currency_unit.clone(),
            columns: ColumnAliases::default().with_overrides(
                self.period_col.as_deref(),
                self.value_col.as_deref(),
                self.reference_col.as_deref(),
                self.change_col.as_deref(),
            ),
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Disable the data table.
    #[arg(long)]
    pub no_table: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Output CSV path. Defaults to `sales_data_<timestamp>.csv` in the current directory.
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Output JSON path.
    #[arg(short, long, value_name = "JSON", default_value = "chart.json")]
    pub output: PathBuf,
}

/// Options for plotting a saved chart.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Chart JSON file produced by `salesdash chart`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Write logs to this file (the TUI owns the terminal, so logs are dropped otherwise).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dashboard_flags_map_to_config() {
        let cli = Cli::parse_from([
            "salesdash",
            "summary",
            "-f",
            "sales.csv",
            "--theme",
            "light",
            "--no-smooth",
            "--bar-width",
            "80",
            "--index",
            "--currency-unit",
            " USD",
            "--value-col",
            "Umsatz",
        ]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        let config = args.dashboard.to_config();
        assert_eq!(config.input, Some(PathBuf::from("sales.csv")));
        assert_eq!(config.theme, Theme::Light);
        assert!(!config.smooth_line);
        assert_eq!(config.bar_width_pct, 80);
        assert!(config.show_index);
        assert_eq!(config.currency_unit, " USD");
        assert_eq!(config.columns.value[0], "Umsatz");
    }

    #[test]
    fn bar_width_out_of_range_is_rejected() {
        let res = Cli::try_parse_from(["salesdash", "summary", "--bar-width", "10"]);
        assert!(res.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["salesdash", "export", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
