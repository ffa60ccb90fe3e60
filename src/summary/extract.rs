//! Per-model extraction: tidy + glance output turned into formatted long rows.

use std::collections::HashMap;

use log::{debug, warn};

use crate::domain::{RowPart, Statistic, TidyRow};
use crate::error::AppError;
use crate::math::{confidence_interval, pvalue};
use crate::models::{Glance, TidyModel, TidyTerm};
use crate::summary::{CompiledOptions, StatisticOverride, SummaryOptions};

/// Extract the rows of the model at `index` (0-based).
///
/// Adapter failures are reported against the 1-based model position.
pub fn extract_model(
    index: usize,
    model: &dyn TidyModel,
    opts: &SummaryOptions,
    compiled: &CompiledOptions,
) -> Result<Vec<TidyRow>, AppError> {
    let number = index + 1;

    let mut terms = model.tidy(opts.conf_level).map_err(|e| as_adapter(number, e))?;
    check_unique_terms(number, &terms)?;
    let glance = model.glance().map_err(|e| as_adapter(number, e))?;

    if let Some(ovr) = opts.statistic_override.as_ref().and_then(|all| all.get(index)) {
        let se = override_std_errors(number, model, ovr)?;
        apply_std_errors(&mut terms, &se, opts.conf_level, glance.get("df.residual"));
    }

    let mut rows = Vec::with_capacity(2 * terms.len() + glance.len() + opts.add_rows.len());
    let mut labelled: HashMap<String, String> = HashMap::new();

    for term in &terms {
        let label = match &opts.coef_map {
            Some(map) => match map.get(&term.term) {
                Some(clean) => clean.to_string(),
                None => continue,
            },
            None => {
                if compiled.coef_omit.as_ref().is_some_and(|re| re.is_match(&term.term)) {
                    continue;
                }
                term.term.clone()
            }
        };
        if let Some(previous) = labelled.insert(label.clone(), term.term.clone()) {
            return Err(AppError::validation(format!(
                "model {number}: terms '{previous}' and '{}' both map to '{label}'",
                term.term
            )));
        }

        let mut estimate = compiled.fmt.apply(term.estimate);
        if !opts.stars.is_empty() {
            let p = term.p_value.ok_or_else(|| {
                AppError::adapter(number, format!("no p.value for '{}'; stars need one", term.term))
            })?;
            estimate.push_str(opts.stars.symbol_for(p));
        }

        let uncertainty = uncertainty_cell(number, term, opts.statistic, compiled)?;

        rows.push(TidyRow {
            term: label.clone(),
            part: RowPart::Estimate,
            value: estimate,
            model_index: index,
        });
        rows.push(TidyRow {
            term: label,
            part: RowPart::Uncertainty,
            value: uncertainty,
            model_index: index,
        });
    }
    let n_coef = rows.len() / 2;

    rows.extend(gof_rows(index, &glance, opts, compiled));
    rows.extend(opts.add_rows.iter().map(|row| TidyRow {
        term: row[0].clone(),
        part: RowPart::Added,
        value: row[index + 1].clone(),
        model_index: index,
    }));

    debug!(
        "model {number}: {} of {} terms kept, {} summary rows",
        n_coef,
        terms.len(),
        rows.len() - 2 * n_coef
    );
    Ok(rows)
}

fn as_adapter(number: usize, err: AppError) -> AppError {
    match err {
        AppError::Adapter { message, .. } => AppError::adapter(number, message),
        other => AppError::adapter(number, other.to_string()),
    }
}

fn check_unique_terms(number: usize, terms: &[TidyTerm]) -> Result<(), AppError> {
    let mut seen = std::collections::HashSet::new();
    for t in terms {
        if !seen.insert(t.term.as_str()) {
            return Err(AppError::adapter(number, format!("term '{}' is reported twice", t.term)));
        }
    }
    Ok(())
}

fn override_std_errors(
    number: usize,
    model: &dyn TidyModel,
    ovr: &StatisticOverride,
) -> Result<Vec<(String, f64)>, AppError> {
    match ovr {
        StatisticOverride::Function(f) => {
            let cov = f(model).map_err(|e| as_adapter(number, e))?;
            if let Some(problem) = cov.shape_error() {
                return Err(AppError::adapter(number, problem));
            }
            Ok(cov.std_errors())
        }
        StatisticOverride::Matrix(cov) => Ok(cov.std_errors()),
        StatisticOverride::Vector(values) => Ok(values.clone()),
    }
}

/// Swap in replacement standard errors and recompute everything derived from them.
fn apply_std_errors(terms: &mut [TidyTerm], se: &[(String, f64)], conf_level: f64, df: Option<f64>) {
    for (name, _) in se {
        if !terms.iter().any(|t| &t.term == name) {
            debug!("override term '{name}' is not in the model; dropped");
        }
    }
    for term in terms.iter_mut() {
        let std_error = se
            .iter()
            .find(|(name, _)| *name == term.term)
            .map(|(_, v)| *v)
            .unwrap_or(f64::NAN);
        let statistic = term.estimate / std_error;
        let (low, high) = confidence_interval(term.estimate, std_error, conf_level, df);
        term.std_error = std_error;
        term.statistic = Some(statistic);
        term.p_value = Some(pvalue(statistic, df));
        term.conf_low = Some(low);
        term.conf_high = Some(high);
    }
}

fn uncertainty_cell(
    number: usize,
    term: &TidyTerm,
    statistic: Statistic,
    compiled: &CompiledOptions,
) -> Result<String, AppError> {
    let column = |value: Option<f64>| {
        value.ok_or_else(|| {
            AppError::adapter(
                number,
                format!("no {} for '{}'", statistic.column_name(), term.term),
            )
        })
    };
    let fmt = &compiled.fmt;

    if statistic == Statistic::ConfInt {
        let low = fmt.apply(column(term.conf_low)?);
        let high = fmt.apply(column(term.conf_high)?);
        if low.is_empty() && high.is_empty() {
            return Ok(String::new());
        }
        return Ok(format!("[{low}, {high}]"));
    }

    let value = match statistic {
        Statistic::StdError => term.std_error,
        Statistic::Statistic => column(term.statistic)?,
        Statistic::PValue => column(term.p_value)?,
        Statistic::ConfLow => column(term.conf_low)?,
        Statistic::ConfHigh | Statistic::ConfInt => column(term.conf_high)?,
    };
    let text = fmt.apply(value);
    Ok(if text.is_empty() { text } else { format!("({text})") })
}

fn gof_rows<'a>(
    index: usize,
    glance: &'a Glance,
    opts: &'a SummaryOptions,
    compiled: &'a CompiledOptions,
) -> impl Iterator<Item = TidyRow> + 'a {
    glance.iter().filter_map(move |(raw, value)| {
        let (clean, fmt) = match opts.gof_map.get(raw) {
            Some(entry) if entry.omit => return None,
            Some(entry) => (entry.clean.as_str(), compiled.gof_fmts.get(raw).unwrap_or(&compiled.fmt)),
            None => (raw, &compiled.fmt),
        };
        if compiled
            .gof_omit
            .as_ref()
            .is_some_and(|re| re.is_match(raw) || re.is_match(clean))
        {
            return None;
        }
        if !value.is_finite() {
            warn!("model {}: dropping non-finite '{raw}' ({value})", index + 1);
            return None;
        }
        Some(TidyRow {
            term: clean.to_string(),
            part: RowPart::Gof,
            value: fmt.apply(value),
            model_index: index,
        })
    })
}
