//! Caller-facing inputs: the model set and the option bundle.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{CoefficientMap, Covariance, GofMap, StarsSpec, Statistic};
use crate::error::AppError;
use crate::models::TidyModel;

/// Computes a covariance matrix for a model (e.g. a robust estimator).
pub type CovarianceFn = Arc<dyn Fn(&dyn TidyModel) -> Result<Covariance, AppError> + Send + Sync>;

/// Replacement uncertainty for one model.
///
/// Every variant is normalized to "replacement std.error by term name".
#[derive(Clone)]
pub enum StatisticOverride {
    /// Called with the model; the square root of the diagonal is used.
    Function(CovarianceFn),
    /// Square root of the diagonal is used.
    Matrix(Covariance),
    /// Standard errors keyed by term, used as given.
    Vector(Vec<(String, f64)>),
}

impl StatisticOverride {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&dyn TidyModel) -> Result<Covariance, AppError> + Send + Sync + 'static,
    {
        StatisticOverride::Function(Arc::new(f))
    }

    pub fn vector<S: Into<String>>(values: impl IntoIterator<Item = (S, f64)>) -> Self {
        StatisticOverride::Vector(values.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl std::fmt::Debug for StatisticOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatisticOverride::Function(_) => f.write_str("Function(..)"),
            StatisticOverride::Matrix(cov) => f.debug_tuple("Matrix").field(cov).finish(),
            StatisticOverride::Vector(values) => f.debug_tuple("Vector").field(values).finish(),
        }
    }
}

/// Everything that controls one summary table.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub statistic: Statistic,
    /// One entry per model, in model order.
    pub statistic_override: Option<Vec<StatisticOverride>>,
    pub conf_level: f64,
    pub coef_map: Option<CoefficientMap>,
    /// Regex; matching terms are dropped. Ignored when `coef_map` is set.
    pub coef_omit: Option<String>,
    pub gof_map: GofMap,
    /// Regex matched against raw and clean gof names.
    pub gof_omit: Option<String>,
    /// printf-style format for estimates, uncertainty and unmapped gof values.
    pub fmt: String,
    pub stars: StarsSpec,
    pub stars_note: bool,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub notes: Vec<String>,
    /// Extra rows `[label, value per model...]` appended after the gof rows.
    pub add_rows: Vec<Vec<String>>,
    /// When set, the table is written here and nothing is returned.
    pub filename: Option<PathBuf>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            statistic: Statistic::StdError,
            statistic_override: None,
            conf_level: 0.95,
            coef_map: None,
            coef_omit: None,
            gof_map: GofMap::default(),
            gof_omit: None,
            fmt: "%.3f".to_string(),
            stars: StarsSpec::none(),
            stars_note: true,
            title: None,
            subtitle: None,
            notes: Vec::new(),
            add_rows: Vec::new(),
            filename: None,
        }
    }
}

/// A named model.
pub struct ModelEntry<'a> {
    pub name: String,
    pub model: &'a dyn TidyModel,
}

/// The models to tabulate, always as a sequence.
///
/// The `From` impls below are the only place a single model or an unnamed list is
/// turned into a named sequence; unnamed models become "Model 1", "Model 2", ...
pub struct ModelSet<'a> {
    entries: Vec<ModelEntry<'a>>,
}

impl<'a> ModelSet<'a> {
    pub fn new(entries: Vec<ModelEntry<'a>>) -> Self {
        Self { entries }
    }

    pub fn from_slice<M: TidyModel>(models: &'a [M]) -> Self {
        models.iter().map(|m| m as &dyn TidyModel).collect::<Vec<_>>().into()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelEntry<'a>> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}

fn default_name(i: usize) -> String {
    format!("Model {}", i + 1)
}

impl<'a, M: TidyModel> From<&'a M> for ModelSet<'a> {
    fn from(model: &'a M) -> Self {
        Self::new(vec![ModelEntry {
            name: default_name(0),
            model,
        }])
    }
}

impl<'a> From<Vec<&'a dyn TidyModel>> for ModelSet<'a> {
    fn from(models: Vec<&'a dyn TidyModel>) -> Self {
        Self::new(
            models
                .into_iter()
                .enumerate()
                .map(|(i, model)| ModelEntry {
                    name: default_name(i),
                    model,
                })
                .collect(),
        )
    }
}

impl<'a, S: Into<String>> From<Vec<(S, &'a dyn TidyModel)>> for ModelSet<'a> {
    fn from(models: Vec<(S, &'a dyn TidyModel)>) -> Self {
        Self::new(
            models
                .into_iter()
                .map(|(name, model)| ModelEntry {
                    name: name.into(),
                    model,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Glance, TidyTerm};

    struct Fixed;

    impl TidyModel for Fixed {
        fn tidy(&self, _conf_level: f64) -> Result<Vec<TidyTerm>, AppError> {
            Ok(vec![TidyTerm::new("x", 1.0, 0.5)])
        }

        fn glance(&self) -> Result<Glance, AppError> {
            Ok(Glance::new())
        }
    }

    #[test]
    fn single_model_becomes_a_one_element_set() {
        let m = Fixed;
        let set: ModelSet = (&m).into();
        assert_eq!(set.names(), vec!["Model 1"]);
    }

    #[test]
    fn unnamed_and_named_lists() {
        let (a, b) = (Fixed, Fixed);
        let set: ModelSet = vec![&a as &dyn TidyModel, &b].into();
        assert_eq!(set.names(), vec!["Model 1", "Model 2"]);

        let set: ModelSet = vec![("OLS", &a as &dyn TidyModel), ("Robust", &b as &dyn TidyModel)].into();
        assert_eq!(set.names(), vec!["OLS", "Robust"]);

        let models = [Fixed, Fixed, Fixed];
        assert_eq!(ModelSet::from_slice(&models).len(), 3);
    }

    #[test]
    fn defaults() {
        let opts = SummaryOptions::default();
        assert_eq!(opts.statistic, Statistic::StdError);
        assert_eq!(opts.conf_level, 0.95);
        assert_eq!(opts.fmt, "%.3f");
        assert!(opts.stars.is_empty());
        assert!(opts.stars_note);
        assert_eq!(opts.gof_map, GofMap::default());
    }
}
