//! Argument checks run before any model is touched.
//!
//! Besides rejecting bad input, validation compiles the regexes and format specs
//! once so extraction can't fail on them later.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::domain::{CoefficientMap, GofMap, OutputFormat, StarsSpec};
use crate::error::AppError;
use crate::report::FmtSpec;
use crate::summary::{ModelSet, StatisticOverride, SummaryOptions};

/// Parsed forms of the string-typed options.
#[derive(Debug, Clone)]
pub struct CompiledOptions {
    pub fmt: FmtSpec,
    pub coef_omit: Option<Regex>,
    pub gof_omit: Option<Regex>,
    /// Format per raw gof name, for visible gof-map entries.
    pub gof_fmts: HashMap<String, FmtSpec>,
}

pub fn validate(models: &ModelSet<'_>, opts: &SummaryOptions) -> Result<CompiledOptions, AppError> {
    if models.is_empty() {
        return Err(AppError::validation("at least one model is required"));
    }
    let n_models = models.len();

    if !(opts.conf_level > 0.0 && opts.conf_level < 1.0) {
        return Err(AppError::validation(format!(
            "conf_level must be strictly between 0 and 1, got {}",
            opts.conf_level
        )));
    }

    if let Some(overrides) = &opts.statistic_override {
        validate_overrides(overrides, n_models)?;
    }

    if let Some(map) = &opts.coef_map {
        validate_coef_map(map)?;
    }
    let gof_fmts = validate_gof_map(&opts.gof_map)?;

    let coef_omit = compile_regex(opts.coef_omit.as_deref(), "coef_omit")?;
    let gof_omit = compile_regex(opts.gof_omit.as_deref(), "gof_omit")?;

    let fmt = FmtSpec::parse(&opts.fmt)?;

    validate_stars(&opts.stars)?;

    for (i, row) in opts.add_rows.iter().enumerate() {
        if row.len() != n_models + 1 {
            return Err(AppError::validation(format!(
                "add_rows row {} has {} entries; expected {} (label + one per model)",
                i + 1,
                row.len(),
                n_models + 1
            )));
        }
    }

    if let Some(path) = &opts.filename {
        OutputFormat::from_path(path)?;
    }

    Ok(CompiledOptions {
        fmt,
        coef_omit,
        gof_omit,
        gof_fmts,
    })
}

fn validate_overrides(overrides: &[StatisticOverride], n_models: usize) -> Result<(), AppError> {
    if overrides.len() != n_models {
        return Err(AppError::validation(format!(
            "statistic_override has {} entries for {n_models} models",
            overrides.len()
        )));
    }
    for (i, ovr) in overrides.iter().enumerate() {
        match ovr {
            StatisticOverride::Function(_) => {}
            StatisticOverride::Matrix(cov) => {
                if let Some(problem) = cov.shape_error() {
                    return Err(AppError::validation(format!(
                        "statistic_override for model {}: {problem}",
                        i + 1
                    )));
                }
            }
            StatisticOverride::Vector(values) => {
                if values.is_empty() {
                    return Err(AppError::validation(format!(
                        "statistic_override for model {} is an empty vector",
                        i + 1
                    )));
                }
                let mut seen = HashSet::new();
                for (name, value) in values {
                    if name.is_empty() || !seen.insert(name.as_str()) {
                        return Err(AppError::validation(format!(
                            "statistic_override for model {} needs unique, non-empty term names",
                            i + 1
                        )));
                    }
                    if !value.is_finite() || *value < 0.0 {
                        return Err(AppError::validation(format!(
                            "statistic_override for model {}: '{name}' has invalid value {value}",
                            i + 1
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

fn validate_coef_map(map: &CoefficientMap) -> Result<(), AppError> {
    if map.is_empty() {
        return Err(AppError::validation("coef_map is empty"));
    }
    let mut seen = HashSet::new();
    for (raw, clean) in map.entries() {
        if raw.is_empty() || clean.is_empty() {
            return Err(AppError::validation("coef_map entries need both a raw and a clean name"));
        }
        if !seen.insert(raw.as_str()) {
            return Err(AppError::validation(format!("coef_map lists '{raw}' more than once")));
        }
    }
    Ok(())
}

fn validate_gof_map(map: &GofMap) -> Result<HashMap<String, FmtSpec>, AppError> {
    let mut fmts = HashMap::new();
    let mut seen = HashSet::new();
    let mut labels = HashSet::new();
    for entry in map.entries() {
        if entry.raw.is_empty() {
            return Err(AppError::validation("gof_map entries need a raw name"));
        }
        if !seen.insert(entry.raw.as_str()) {
            return Err(AppError::validation(format!("gof_map lists '{}' more than once", entry.raw)));
        }
        if entry.omit {
            continue;
        }
        if entry.clean.is_empty() {
            return Err(AppError::validation(format!("gof_map entry '{}' has no clean name", entry.raw)));
        }
        // One visible statistic per clean name.
        if !labels.insert(entry.clean.as_str()) {
            return Err(AppError::validation(format!(
                "gof_map shows both '{}' and another statistic as '{}'",
                entry.raw, entry.clean
            )));
        }
        let spec = FmtSpec::parse(&entry.fmt).map_err(|e| {
            AppError::validation(format!("gof_map entry '{}': {e}", entry.raw))
        })?;
        fmts.insert(entry.raw.clone(), spec);
    }
    Ok(fmts)
}

fn validate_stars(stars: &StarsSpec) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for (symbol, threshold) in stars.levels() {
        if symbol.is_empty() || !seen.insert(symbol.as_str()) {
            return Err(AppError::validation("stars need unique, non-empty symbols"));
        }
        if !(*threshold > 0.0 && *threshold <= 1.0) {
            return Err(AppError::validation(format!(
                "stars threshold for '{symbol}' must be in (0, 1], got {threshold}"
            )));
        }
    }
    Ok(())
}

fn compile_regex(pattern: Option<&str>, what: &str) -> Result<Option<Regex>, AppError> {
    pattern
        .map(|p| Regex::new(p).map_err(|e| AppError::validation(format!("{what} is not a valid regex: {e}"))))
        .transpose()
}
