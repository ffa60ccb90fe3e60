//! The rendered summary table and its output formats.
//!
//! We keep formatting code in one place so:
//! - the extraction/assembly code stays free of markup
//! - output changes are localized (each format lives in its own file)
//!
//! Rendering is deterministic: the same table always produces the same bytes.

use std::path::Path;

use crate::domain::{AssembledTable, OutputFormat};
use crate::error::AppError;
use crate::io::write_rendered;

pub mod html;
pub mod latex;
pub mod numfmt;
pub mod rtf;

pub use numfmt::FmtSpec;

/// An assembled table plus header text and source notes.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub table: AssembledTable,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Printed under the table, in order.
    pub notes: Vec<String>,
}

impl SummaryTable {
    pub fn new(table: AssembledTable) -> Self {
        Self {
            table,
            title: None,
            subtitle: None,
            notes: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle;
        self
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn to_html(&self) -> String {
        html::render(self)
    }

    pub fn to_latex(&self) -> String {
        latex::render(self)
    }

    pub fn to_rtf(&self) -> String {
        rtf::render(self)
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Html => self.to_html(),
            OutputFormat::Latex => self.to_latex(),
            OutputFormat::Rtf => self.to_rtf(),
        }
    }

    /// Render in the format implied by the extension and write to `path`.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let format = OutputFormat::from_path(path)?;
        write_rendered(path, &self.render(format))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{AssembledRow, AssembledTable, RowGroup};

    use super::SummaryTable;

    fn row(label: &str, group: RowGroup, values: &[&str]) -> AssembledRow {
        AssembledRow {
            label: label.to_string(),
            group,
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Two models, one shared coefficient, one gof row.
    pub fn small_table() -> SummaryTable {
        let table = AssembledTable {
            model_names: vec!["Model 1".to_string(), "Model 2".to_string()],
            rows: vec![
                row("x_1", RowGroup::Estimate, &["1.000**", "0.900"]),
                row("", RowGroup::Estimate, &["(0.100)", "(0.500)"]),
                row("Num.Obs.", RowGroup::Gof, &["32", ""]),
            ],
            estimate_rows: 0..2,
        };
        let mut t = SummaryTable::new(table)
            .with_title(Some("Fuel & weight".to_string()))
            .with_subtitle(Some("OLS <linear>".to_string()));
        t.add_note("* p < 0.1, ** p < 0.05, *** p < 0.01");
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_dispatches_on_format() {
        let t = fixtures::small_table();
        assert_eq!(t.render(OutputFormat::Html), t.to_html());
        assert_eq!(t.render(OutputFormat::Latex), t.to_latex());
        assert_eq!(t.render(OutputFormat::Rtf), t.to_rtf());
    }

    #[test]
    fn save_infers_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let t = fixtures::small_table();

        let tex = dir.path().join("table.tex");
        t.save(&tex).unwrap();
        let contents = std::fs::read_to_string(&tex).unwrap();
        assert!(contents.contains("\\begin{tabular}"));
        assert!(contents.contains("\\end{tabular}"));

        let rtf = dir.path().join("table.rtf");
        t.save(&rtf).unwrap();
        assert!(std::fs::read_to_string(&rtf).unwrap().starts_with("{\\rtf1"));
    }

    #[test]
    fn save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.xyz");
        let err = fixtures::small_table().save(&path).unwrap_err();
        assert!(err.is_validation());
        assert!(!path.exists());
    }
}
