//! CSV loading for the built-in linear model adapter.
//!
//! Every column is parsed as numeric. Empty cells and `NA` / `NaN` become missing
//! values (NaN) so the fitter can drop incomplete rows; anything else that fails
//! to parse is a format error naming the line and column.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::AppError;

/// Column-oriented numeric table.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    n_rows: usize,
}

impl Dataset {
    /// Build from named columns of equal length.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self, AppError> {
        let n_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        let mut index = HashMap::new();
        for (name, col) in columns {
            if col.len() != n_rows {
                return Err(AppError::validation(format!(
                    "column '{name}' has {} values, expected {n_rows}",
                    col.len()
                )));
            }
            if index.insert(name.clone(), names.len()).is_some() {
                return Err(AppError::validation(format!("duplicate column '{name}'")));
            }
            names.push(name);
            data.push(col);
        }
        Ok(Self {
            names,
            columns: data,
            index,
            n_rows,
        })
    }

    pub fn read_csv(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::validation(format!("failed to read CSV headers: {e}")))?
            .iter()
            .map(normalize_header_name)
            .collect();

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        for (idx, result) in reader.records().enumerate() {
            // +2: records start after the header and CSV lines are 1-based.
            let line = idx + 2;
            let record =
                result.map_err(|e| AppError::validation(format!("CSV parse error on line {line}: {e}")))?;
            for (c, name) in headers.iter().enumerate() {
                let raw = record.get(c).unwrap_or("");
                let value = parse_cell(raw).ok_or_else(|| {
                    AppError::format(format!("line {line}, column '{name}': '{raw}' is not a number"))
                })?;
                columns[c].push(value);
            }
        }

        Self::from_columns(headers.into_iter().zip(columns).collect())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Result<&[f64], AppError> {
        self.index
            .get(name)
            .map(|&i| self.columns[i].as_slice())
            .ok_or_else(|| AppError::validation(format!("no column named '{name}' in the data")))
    }
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_cell(raw: &str) -> Option<f64> {
    match raw {
        "" | "NA" | "NaN" | "nan" => Some(f64::NAN),
        other => other.parse::<f64>().ok(),
    }
}
