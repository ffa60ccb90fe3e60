//! Shared domain types.
//!
//! All of these are built fresh for each summary call and dropped once the table
//! is rendered; nothing here is global or cached.

use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which uncertainty measure is shown beneath each estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    StdError,
    Statistic,
    PValue,
    ConfLow,
    ConfHigh,
    /// `[conf.low, conf.high]` at the configured confidence level.
    ConfInt,
}

impl Statistic {
    /// Column name as the tidy convention spells it.
    pub fn column_name(self) -> &'static str {
        match self {
            Statistic::StdError => "std.error",
            Statistic::Statistic => "statistic",
            Statistic::PValue => "p.value",
            Statistic::ConfLow => "conf.low",
            Statistic::ConfHigh => "conf.high",
            Statistic::ConfInt => "conf.int",
        }
    }
}

impl FromStr for Statistic {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "std.error" => Ok(Statistic::StdError),
            "statistic" => Ok(Statistic::Statistic),
            "p.value" => Ok(Statistic::PValue),
            "conf.low" => Ok(Statistic::ConfLow),
            "conf.high" => Ok(Statistic::ConfHigh),
            "conf.int" => Ok(Statistic::ConfInt),
            other => Err(AppError::validation(format!(
                "statistic '{other}' is not one of std.error, statistic, p.value, conf.low, conf.high, conf.int"
            ))),
        }
    }
}

/// Which rows a cell belongs to in the rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowGroup {
    Estimate,
    Gof,
}

/// Position of a long-format row inside its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowPart {
    /// Formatted coefficient (plus stars).
    Estimate,
    /// The uncertainty value paired with the coefficient above it.
    Uncertainty,
    /// Goodness-of-fit statistic.
    Gof,
    /// User-supplied row, shown after every gof statistic.
    Added,
}

/// One formatted cell of one model, in long format.
///
/// Uncertainty rows carry the term of the coefficient they belong to; the
/// assembler blanks that label when it lays out the wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    pub term: String,
    pub part: RowPart,
    pub value: String,
    pub model_index: usize,
}

impl TidyRow {
    pub fn group(&self) -> RowGroup {
        match self.part {
            RowPart::Estimate | RowPart::Uncertainty => RowGroup::Estimate,
            RowPart::Gof | RowPart::Added => RowGroup::Gof,
        }
    }
}

/// Ordered raw-term -> display-name mapping.
///
/// Terms absent from the map are dropped. Several raw names may share one display
/// name, which is how differently named coefficients are aligned across models.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoefficientMap {
    entries: Vec<(String, String)>,
}

impl CoefficientMap {
    pub fn new<R, C>(entries: impl IntoIterator<Item = (R, C)>) -> Self
    where
        R: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(raw, clean)| (raw.into(), clean.into()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name for a raw term, if mapped.
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| r == raw)
            .map(|(_, clean)| clean.as_str())
    }

    /// Distinct display names in map order.
    pub fn display_order(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for (_, clean) in &self.entries {
            if !out.contains(&clean.as_str()) {
                out.push(clean);
            }
        }
        out
    }
}

/// How one goodness-of-fit statistic is renamed, formatted or hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GofEntry {
    pub raw: String,
    pub clean: String,
    pub fmt: String,
    pub omit: bool,
}

impl GofEntry {
    pub fn new(raw: &str, clean: &str, fmt: &str, omit: bool) -> Self {
        Self {
            raw: raw.to_string(),
            clean: clean.to_string(),
            fmt: fmt.to_string(),
            omit,
        }
    }
}

/// Table of known goodness-of-fit statistics.
///
/// Statistics not listed here pass through under their raw name with the default
/// number format.
#[derive(Debug, Clone, PartialEq)]
pub struct GofMap {
    entries: Vec<GofEntry>,
}

impl GofMap {
    pub fn new(entries: Vec<GofEntry>) -> Self {
        Self { entries }
    }

    /// A map that knows nothing: every statistic passes through.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[GofEntry] {
        &self.entries
    }

    pub fn get(&self, raw: &str) -> Option<&GofEntry> {
        self.entries.iter().find(|e| e.raw == raw)
    }

    /// Clean names of the visible entries, in map order.
    pub fn display_order(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for entry in self.entries.iter().filter(|e| !e.omit) {
            if !out.contains(&entry.clean.as_str()) {
                out.push(&entry.clean);
            }
        }
        out
    }
}

impl Default for GofMap {
    fn default() -> Self {
        Self::new(vec![
            GofEntry::new("nobs", "Num.Obs.", "%.0f", false),
            GofEntry::new("r.squared", "R2", "%.3f", false),
            GofEntry::new("adj.r.squared", "R2 Adj.", "%.3f", false),
            GofEntry::new("AIC", "AIC", "%.1f", false),
            GofEntry::new("BIC", "BIC", "%.1f", false),
            GofEntry::new("logLik", "Log.Lik.", "%.3f", false),
            GofEntry::new("statistic", "F", "%.3f", false),
            GofEntry::new("p.value", "p", "%.3f", true),
            GofEntry::new("sigma", "Sigma", "%.3f", true),
            GofEntry::new("df", "DF", "%.0f", true),
            GofEntry::new("df.residual", "DF Resid.", "%.0f", true),
            GofEntry::new("deviance", "Deviance", "%.2f", true),
            GofEntry::new("null.deviance", "Null Deviance", "%.2f", true),
            GofEntry::new("df.null", "DF Null", "%.0f", true),
        ])
    }
}

/// Significance symbols keyed by p-value threshold, sorted descending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StarsSpec {
    levels: Vec<(String, f64)>,
}

impl StarsSpec {
    pub fn new<S: Into<String>>(levels: impl IntoIterator<Item = (S, f64)>) -> Self {
        let mut levels: Vec<(String, f64)> = levels.into_iter().map(|(s, t)| (s.into(), t)).collect();
        levels.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Self { levels }
    }

    /// `* p < 0.1, ** p < 0.05, *** p < 0.01`.
    pub fn conventional() -> Self {
        Self::new([("*", 0.1), ("**", 0.05), ("***", 0.01)])
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> &[(String, f64)] {
        &self.levels
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Symbol of the smallest threshold that is still `>= p`.
    ///
    /// Thresholds are walked from the most permissive down; each match replaces
    /// the previous one.
    pub fn symbol_for(&self, p: f64) -> &str {
        let mut symbol = "";
        if !p.is_finite() {
            return symbol;
        }
        for (s, threshold) in &self.levels {
            if *threshold >= p {
                symbol = s;
            }
        }
        symbol
    }

    /// Legend used as a table note, e.g. `* p < 0.1, ** p < 0.05`.
    pub fn legend(&self) -> String {
        self.levels
            .iter()
            .map(|(s, t)| format!("{s} p < {t}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Covariance matrix with row/column term names.
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance {
    pub terms: Vec<String>,
    pub matrix: DMatrix<f64>,
}

impl Covariance {
    pub fn new(terms: Vec<String>, matrix: DMatrix<f64>) -> Self {
        Self { terms, matrix }
    }

    /// Standard errors: square root of the diagonal, keyed by term.
    pub fn std_errors(&self) -> Vec<(String, f64)> {
        self.terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), self.matrix[(i, i)].sqrt()))
            .collect()
    }

    /// Shape problems that make the matrix unusable, if any.
    pub fn shape_error(&self) -> Option<String> {
        let (rows, cols) = self.matrix.shape();
        if rows != cols {
            return Some(format!("covariance matrix is {rows}x{cols}, expected square"));
        }
        if self.terms.len() != rows {
            return Some(format!(
                "covariance matrix has {rows} rows but {} term names",
                self.terms.len()
            ));
        }
        None
    }
}

/// Output formats supported by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Latex,
    Rtf,
}

impl OutputFormat {
    /// Infer the format from a file extension (`html`, `tex`, `ltx`, `rtf`).
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "html" => Ok(OutputFormat::Html),
            "tex" | "ltx" => Ok(OutputFormat::Latex),
            "rtf" => Ok(OutputFormat::Rtf),
            _ => Err(AppError::validation(format!(
                "cannot infer output format from '{}': extension must be html, tex, ltx or rtf",
                path.display()
            ))),
        }
    }
}

/// One row of the wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRow {
    pub label: String,
    pub group: RowGroup,
    /// One formatted cell per model, empty when the model has no value.
    pub values: Vec<String>,
}

/// Wide table: rows are terms and gof labels, columns are models.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledTable {
    pub model_names: Vec<String>,
    pub rows: Vec<AssembledRow>,
    /// Contiguous range of estimate rows; gof rows follow it.
    pub estimate_rows: Range<usize>,
}

impl AssembledTable {
    pub fn column_count(&self) -> usize {
        self.model_names.len() + 1
    }

    pub fn gof_rows(&self) -> &[AssembledRow] {
        &self.rows[self.estimate_rows.end..]
    }

    /// Find the first row with the given label.
    pub fn row(&self, label: &str) -> Option<&AssembledRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}
