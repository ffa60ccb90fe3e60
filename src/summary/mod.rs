//! Model summary pipeline.
//!
//! `model_summary` is the single entry point. It runs, in order:
//! - `validate`: checks every option and compiles regexes and formats, before any
//!   model is touched
//! - `extract_model`: per model, tidy + glance into formatted long rows (stars,
//!   overrides, coefficient renaming and omission happen here)
//! - `assemble`: merges the long rows into one wide table
//!
//! The result is a `SummaryTable`, rendered by `crate::report`. Nothing is
//! cached between calls.

use log::debug;

use crate::error::AppError;
use crate::report::SummaryTable;

pub mod assemble;
pub mod extract;
pub mod options;
pub mod validate;

pub use assemble::*;
pub use extract::*;
pub use options::*;
pub use validate::*;

/// Build a summary table for one or more models.
///
/// Returns `Ok(None)` when `options.filename` is set (the table is written
/// there), otherwise the table itself.
pub fn model_summary<'a>(
    models: impl Into<ModelSet<'a>>,
    options: &SummaryOptions,
) -> Result<Option<SummaryTable>, AppError> {
    let models = models.into();
    let compiled = validate(&models, options)?;

    let mut streams = Vec::with_capacity(models.len());
    for (i, entry) in models.iter().enumerate() {
        streams.push(extract_model(i, entry.model, options, &compiled)?);
    }

    let table = assemble(models.names(), &streams, options.coef_map.as_ref(), &options.gof_map);
    debug!(
        "assembled {} rows ({} estimate) for {} models",
        table.rows.len(),
        table.estimate_rows.len(),
        table.model_names.len()
    );

    let mut summary = SummaryTable::new(table)
        .with_title(options.title.clone())
        .with_subtitle(options.subtitle.clone());
    if options.stars_note && !options.stars.is_empty() {
        summary.add_note(options.stars.legend());
    }
    for note in &options.notes {
        summary.add_note(note.clone());
    }

    match &options.filename {
        Some(path) => {
            summary.save(path)?;
            Ok(None)
        }
        None => Ok(Some(summary)),
    }
}
