//! Command-line parsing for the `msum` binary.
//!
//! Parsing and dispatch live apart from the summary code: this module only
//! describes the flags; `crate::app` maps them onto `SummaryOptions`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::OutputFormat;
use crate::models::VcovKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "msum", version, about = "Side-by-side regression summary tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit OLS models on a CSV dataset and summarize them.
    Fit(FitArgs),
    /// Summarize precomputed models stored as JSON.
    Tidy(TidyArgs),
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Dataset with a header row; every used column must be numeric.
    #[arg(long, value_name = "CSV")]
    pub data: PathBuf,

    /// Formula such as `mpg ~ wt + hp`. Repeat for several models.
    #[arg(short = 'm', long = "model", value_name = "FORMULA", required = true)]
    pub models: Vec<String>,

    /// Standard errors from this covariance estimator instead of the model's own.
    #[arg(long, value_enum)]
    pub vcov: Option<VcovKind>,

    #[command(flatten)]
    pub summary: SummaryArgs,
}

#[derive(Debug, Args, Clone)]
pub struct TidyArgs {
    /// Precomputed model JSON. Repeat for several models.
    #[arg(short = 'm', long = "model", value_name = "JSON", required = true)]
    pub models: Vec<PathBuf>,

    #[command(flatten)]
    pub summary: SummaryArgs,
}

/// Table options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    /// std.error, statistic, p.value, conf.low, conf.high or conf.int.
    #[arg(long, default_value = "std.error")]
    pub statistic: String,

    #[arg(long, default_value_t = 0.95)]
    pub conf_level: f64,

    /// CSV with columns raw,clean. Unlisted coefficients are dropped.
    #[arg(long, value_name = "CSV")]
    pub coef_map: Option<PathBuf>,

    /// Drop coefficients whose name matches this regex.
    #[arg(long, value_name = "REGEX")]
    pub coef_omit: Option<String>,

    /// CSV with columns raw,clean,fmt,omit. Replaces the built-in map.
    #[arg(long, value_name = "CSV")]
    pub gof_map: Option<PathBuf>,

    /// Drop goodness-of-fit rows whose raw or display name matches this regex.
    #[arg(long, value_name = "REGEX")]
    pub gof_omit: Option<String>,

    /// printf-style number format.
    #[arg(long, default_value = "%.3f")]
    pub fmt: String,

    /// Mark estimates with * p < 0.1, ** p < 0.05, *** p < 0.01.
    #[arg(long)]
    pub stars: bool,

    /// Leave the stars legend out of the notes.
    #[arg(long)]
    pub no_stars_note: bool,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub subtitle: Option<String>,

    /// Note printed under the table. Repeatable.
    #[arg(long = "note", value_name = "TEXT")]
    pub notes: Vec<String>,

    /// Extra row as `label,value1,value2,...`. Repeatable.
    #[arg(long = "add-row", value_name = "CELLS")]
    pub add_rows: Vec<String>,

    /// Format printed to stdout when no --output is given.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Write the table here; the format follows the extension.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
