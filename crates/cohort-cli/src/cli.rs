//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use cohort_model::PlotType;

#[derive(Parser)]
#[command(
    name = "cohort",
    version,
    about = "Synthetic cohort explorer - generate, filter and plot synthetic patient data",
    long_about = "Generate a synthetic patient cohort over fixed health columns and\n\
                  user-defined columns, filter it, and export a Vega-Lite plot\n\
                  specification or CSV table."
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

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the schema columns, including custom columns from a config file.
    Columns(ColumnsArgs),

    /// Synthesize a cohort, apply filters and export results.
    Generate(GenerateArgs),
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// Session configuration file (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Session configuration file (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of rows to synthesize (clamped to the configured bounds).
    #[arg(long = "rows", value_name = "N", allow_negative_numbers = true)]
    pub rows: Option<i64>,

    /// Seed for reproducible output.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Synthesis method.
    #[arg(long = "method", value_enum)]
    pub method: Option<MethodArg>,

    /// Plot type (scatter, histogram, density, box-plot, bar-chart).
    #[arg(long = "plot", value_parser = parse_plot_type)]
    pub plot: Option<PlotType>,

    /// Column on the x axis.
    #[arg(long = "x", value_name = "COLUMN")]
    pub x: Option<String>,

    /// Column on the y axis (scatter plots).
    #[arg(long = "y", value_name = "COLUMN")]
    pub y: Option<String>,

    /// Column mapped to color (scatter and bar charts).
    #[arg(long = "color-by", value_name = "COLUMN")]
    pub color_by: Option<String>,

    /// Fail instead of dropping a color column the plot cannot use.
    #[arg(long = "strict-color")]
    pub strict_color: bool,

    /// Number of cohort rows to print.
    #[arg(long = "preview", value_name = "N", default_value_t = 10)]
    pub preview: usize,

    /// Write the filtered cohort as CSV.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Write the plot as a Vega-Lite specification.
    #[arg(long = "vega-lite", value_name = "PATH")]
    pub vega_lite: Option<PathBuf>,

    /// Title for the Vega-Lite specification.
    #[arg(long = "title")]
    pub title: Option<String>,
}

fn parse_plot_type(value: &str) -> Result<PlotType, String> {
    value.parse()
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Bootstrap,
    Identity,
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
