//! The adapter trait between fitted models and the summary pipeline.

use std::fmt;

use clap::ValueEnum;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::Covariance;
use crate::error::AppError;

/// One coefficient in tidy form.
///
/// Only `estimate` and `std_error` are mandatory; the remaining columns are
/// adapter-dependent and requested lazily by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyTerm {
    pub term: String,
    pub estimate: f64,
    pub std_error: f64,
    #[serde(default)]
    pub statistic: Option<f64>,
    #[serde(default)]
    pub p_value: Option<f64>,
    #[serde(default)]
    pub conf_low: Option<f64>,
    #[serde(default)]
    pub conf_high: Option<f64>,
}

impl TidyTerm {
    pub fn new(term: impl Into<String>, estimate: f64, std_error: f64) -> Self {
        Self {
            term: term.into(),
            estimate,
            std_error,
            statistic: None,
            p_value: None,
            conf_low: None,
            conf_high: None,
        }
    }
}

/// Scalar model-level statistics, in the order the adapter reports them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Glance {
    stats: Vec<(String, f64)>,
}

impl Glance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.push(name, value);
        self
    }

    /// Insert or replace a statistic, keeping first-insertion order.
    pub fn push(&mut self, name: &str, value: f64) {
        match self.stats.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.stats.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.stats.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.stats.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl FromIterator<(String, f64)> for Glance {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut glance = Glance::new();
        for (name, value) in iter {
            glance.push(&name, value);
        }
        glance
    }
}

// JSON objects map to and from a glance in document order.
impl Serialize for Glance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.stats.len()))?;
        for (name, value) in &self.stats {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Glance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GlanceVisitor;

        impl<'de> Visitor<'de> for GlanceVisitor {
            type Value = Glance;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of numeric statistics")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Glance, A::Error> {
                let mut glance = Glance::new();
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    glance.push(&name, value);
                }
                Ok(glance)
            }
        }

        deserializer.deserialize_map(GlanceVisitor)
    }
}

/// Covariance estimator requested from an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VcovKind {
    /// `σ² (X^T X)^-1`.
    Classical,
    /// White's heteroskedasticity-consistent estimator.
    Hc0,
    /// HC0 with the `n / (n - k)` small-sample correction.
    Hc1,
}

/// A fitted model the summary pipeline can tabulate.
///
/// Implementations must not mutate the model; the pipeline may call these
/// methods more than once.
pub trait TidyModel {
    /// Coefficient table. Confidence bounds, when provided, use `conf_level`.
    fn tidy(&self, conf_level: f64) -> Result<Vec<TidyTerm>, AppError>;

    /// Scalar goodness-of-fit summary (e.g. `nobs`, `r.squared`).
    fn glance(&self) -> Result<Glance, AppError>;

    /// Coefficient covariance matrix, if the adapter can compute one.
    fn covariance(&self, _kind: VcovKind) -> Option<Covariance> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glance_keeps_first_insertion_order() {
        let mut g = Glance::new().with("nobs", 10.0).with("r.squared", 0.5);
        g.push("nobs", 12.0);
        let names: Vec<&str> = g.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["nobs", "r.squared"]);
        assert_eq!(g.get("nobs"), Some(12.0));
        assert_eq!(g.get("AIC"), None);
    }

    #[test]
    fn glance_json_round_trip_keeps_order() {
        let g: Glance = serde_json::from_str(r#"{"sigma":1.5,"nobs":10,"AIC":3.25}"#).unwrap();
        let names: Vec<&str> = g.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["sigma", "nobs", "AIC"]);
        assert_eq!(serde_json::to_string(&g).unwrap(), r#"{"sigma":1.5,"nobs":10.0,"AIC":3.25}"#);
    }

    #[test]
    fn tidy_term_deserializes_with_optional_columns() {
        let t: TidyTerm =
            serde_json::from_str(r#"{"term":"x","estimate":1.5,"std_error":0.2,"p_value":0.01}"#).unwrap();
        assert_eq!(t.term, "x");
        assert_eq!(t.p_value, Some(0.01));
        assert_eq!(t.conf_low, None);
    }
}
