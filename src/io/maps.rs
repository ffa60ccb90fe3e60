//! CSV loaders for coefficient and goodness-of-fit maps.
//!
//! - coefficient map: columns `raw,clean`, one row per kept term, in display order
//! - gof map: columns `raw,clean,fmt,omit`
//!
//! Columns may appear in any order but the set must match exactly.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{CoefficientMap, GofEntry, GofMap};
use crate::error::AppError;

const COEF_COLUMNS: [&str; 2] = ["raw", "clean"];
const GOF_COLUMNS: [&str; 4] = ["raw", "clean", "fmt", "omit"];

pub fn read_coef_map(path: &Path) -> Result<CoefficientMap, AppError> {
    coef_map_from_reader(File::open(path)?)
}

pub fn read_gof_map(path: &Path) -> Result<GofMap, AppError> {
    gof_map_from_reader(File::open(path)?)
}

pub fn coef_map_from_reader<R: Read>(reader: R) -> Result<CoefficientMap, AppError> {
    let rows = read_rows(reader, &COEF_COLUMNS, "coef_map")?;
    Ok(CoefficientMap::new(
        rows.into_iter().map(|mut r| (r.remove("raw").unwrap_or_default(), r.remove("clean").unwrap_or_default())),
    ))
}

pub fn gof_map_from_reader<R: Read>(reader: R) -> Result<GofMap, AppError> {
    let rows = read_rows(reader, &GOF_COLUMNS, "gof_map")?;
    let mut entries = Vec::with_capacity(rows.len());
    for (i, mut row) in rows.into_iter().enumerate() {
        let omit_raw = row.remove("omit").unwrap_or_default();
        let omit = parse_bool(&omit_raw).ok_or_else(|| {
            AppError::validation(format!(
                "gof_map row {}: omit must be true or false, got '{omit_raw}'",
                i + 1
            ))
        })?;
        entries.push(GofEntry {
            raw: row.remove("raw").unwrap_or_default(),
            clean: row.remove("clean").unwrap_or_default(),
            fmt: row.remove("fmt").unwrap_or_default(),
            omit,
        });
    }
    Ok(GofMap::new(entries))
}

fn read_rows<R: Read>(
    reader: R,
    expected: &[&str],
    what: &str,
) -> Result<Vec<HashMap<String, String>>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::validation(format!("failed to read {what} headers: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_ascii_lowercase())
        .collect();
    ensure_column_set(&headers, expected, what)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record: StringRecord =
            result.map_err(|e| AppError::validation(format!("{what} parse error: {e}")))?;
        rows.push(
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect(),
        );
    }
    Ok(rows)
}

fn ensure_column_set(headers: &[String], expected: &[&str], what: &str) -> Result<(), AppError> {
    let mut got: Vec<&str> = headers.iter().map(String::as_str).collect();
    let mut want: Vec<&str> = expected.to_vec();
    got.sort_unstable();
    want.sort_unstable();
    if got != want {
        return Err(AppError::validation(format!(
            "{what} must have exactly the columns {}, found {}",
            expected.join(","),
            headers.join(",")
        )));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_coef_map_in_file_order() {
        let map = coef_map_from_reader("clean,raw\nWeight,wt\nConstant,(Intercept)\n".as_bytes()).unwrap();
        assert_eq!(
            map.entries(),
            &[
                ("wt".to_string(), "Weight".to_string()),
                ("(Intercept)".to_string(), "Constant".to_string())
            ]
        );
    }

    #[test]
    fn rejects_wrong_column_set() {
        let err = coef_map_from_reader("raw,label\nwt,Weight\n".as_bytes()).unwrap_err();
        assert!(err.is_validation());
        let err = gof_map_from_reader("raw,clean,fmt\nnobs,N,%.0f\n".as_bytes()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn reads_gof_map_with_omit_flags() {
        let map = gof_map_from_reader("raw,clean,fmt,omit\nnobs,N,%.0f,FALSE\nAIC,AIC,%.1f,TRUE\n".as_bytes()).unwrap();
        assert_eq!(map.entries().len(), 2);
        assert!(!map.entries()[0].omit);
        assert!(map.entries()[1].omit);
        assert_eq!(map.display_order(), vec!["N"]);
    }

    #[test]
    fn rejects_bad_omit_value() {
        let err = gof_map_from_reader("raw,clean,fmt,omit\nnobs,N,%.0f,maybe\n".as_bytes()).unwrap_err();
        assert!(err.is_validation());
    }
}
