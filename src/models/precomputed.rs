//! Models tidied elsewhere and saved as JSON.
//!
//! ```json
//! {
//!   "name": "Baseline",
//!   "terms": [{"term": "x", "estimate": 1.2, "std_error": 0.3, "p_value": 0.001}],
//!   "glance": {"nobs": 120, "r.squared": 0.41},
//!   "df_residual": 117,
//!   "conf_level": 0.95
//! }
//! ```
//!
//! Missing `statistic` / `p.value` are derived from the estimate and standard
//! error (t with `df_residual` when given, else normal). Stored confidence bounds
//! are used only when `conf_level` says they match the requested level; otherwise
//! they are recomputed the same way. Glance statistics keep their file order.

use std::fs::File;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::math::{confidence_interval, pvalue};
use crate::models::{Glance, TidyModel, TidyTerm};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecomputedModel {
    #[serde(default)]
    pub name: Option<String>,
    pub terms: Vec<TidyTerm>,
    #[serde(default)]
    pub glance: Glance,
    #[serde(default)]
    pub df_residual: Option<f64>,
    /// Level of the stored `conf_low` / `conf_high`, if any were stored.
    #[serde(default)]
    pub conf_level: Option<f64>,
}

impl PrecomputedModel {
    pub fn from_json_str(s: &str) -> Result<Self, AppError> {
        serde_json::from_str(s).map_err(|e| AppError::validation(format!("invalid model JSON: {e}")))
    }

    pub fn read_json(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)?;
        serde_json::from_reader(file)
            .map_err(|e| AppError::validation(format!("invalid model JSON '{}': {e}", path.display())))
    }
}

impl TidyModel for PrecomputedModel {
    fn tidy(&self, conf_level: f64) -> Result<Vec<TidyTerm>, AppError> {
        let df = self.df_residual.or_else(|| self.glance.get("df.residual"));
        let stored_bounds = self
            .conf_level
            .is_some_and(|level| (level - conf_level).abs() < 1e-9);
        if !stored_bounds && self.terms.iter().any(|t| t.conf_low.is_some() || t.conf_high.is_some()) {
            debug!(
                "stored bounds are at level {:?}, recomputing at {conf_level}",
                self.conf_level
            );
        }
        Ok(self
            .terms
            .iter()
            .map(|t| {
                let stat = t.statistic.unwrap_or(t.estimate / t.std_error);
                let (lo, hi) = confidence_interval(t.estimate, t.std_error, conf_level, df);
                TidyTerm {
                    term: t.term.clone(),
                    estimate: t.estimate,
                    std_error: t.std_error,
                    statistic: Some(stat),
                    p_value: Some(t.p_value.unwrap_or_else(|| pvalue(stat, df))),
                    conf_low: Some(t.conf_low.filter(|_| stored_bounds).unwrap_or(lo)),
                    conf_high: Some(t.conf_high.filter(|_| stored_bounds).unwrap_or(hi)),
                }
            })
            .collect())
    }

    fn glance(&self) -> Result<Glance, AppError> {
        Ok(self.glance.clone())
    }
}
