//! Linear regression adapter fitted by ordinary least squares.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::domain::Covariance;
use crate::error::AppError;
use crate::io::Dataset;
use crate::math::{classical_covariance, confidence_interval, fit_ols, pvalue, pvalue_f, sandwich_covariance, OlsSolution};
use crate::models::{Formula, Glance, TidyModel, TidyTerm, VcovKind};

/// A fitted OLS model.
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub formula: Formula,
    pub coefficient_names: Vec<String>,
    design: DMatrix<f64>,
    response: DVector<f64>,
    solution: OlsSolution,
}

impl LinearModel {
    /// Fit `formula` on `data`, dropping rows with a missing value in any used column.
    pub fn fit(data: &Dataset, formula: &Formula) -> Result<Self, AppError> {
        let y_col = data.column(&formula.response)?;
        let x_cols: Vec<&[f64]> = formula
            .terms
            .iter()
            .map(|t| data.column(t))
            .collect::<Result<_, _>>()?;

        let keep: Vec<usize> = (0..data.n_rows())
            .filter(|&i| y_col[i].is_finite() && x_cols.iter().all(|c| c[i].is_finite()))
            .collect();
        if keep.len() < data.n_rows() {
            debug!(
                "{}: dropped {} rows with missing values",
                formula.response,
                data.n_rows() - keep.len()
            );
        }

        let names = formula.coefficient_names();
        let n = keep.len();
        let k = names.len();
        if n <= k {
            return Err(AppError::validation(format!(
                "cannot fit '{} ~ ...': {n} complete rows for {k} coefficients",
                formula.response
            )));
        }

        let mut design = DMatrix::<f64>::zeros(n, k);
        let mut response = DVector::<f64>::zeros(n);
        for (r, &i) in keep.iter().enumerate() {
            let mut c = 0;
            if formula.intercept {
                design[(r, c)] = 1.0;
                c += 1;
            }
            for col in &x_cols {
                design[(r, c)] = col[i];
                c += 1;
            }
            response[r] = y_col[i];
        }

        let solution = fit_ols(&design, &response).ok_or_else(|| {
            AppError::validation(format!(
                "cannot fit '{} ~ {}': design matrix is rank deficient",
                formula.response,
                formula.terms.join(" + ")
            ))
        })?;

        Ok(Self {
            formula: formula.clone(),
            coefficient_names: names,
            design,
            response,
            solution,
        })
    }

    pub fn coefficients(&self) -> &DVector<f64> {
        &self.solution.beta
    }

    pub fn nobs(&self) -> usize {
        self.solution.n
    }

    fn df_residual(&self) -> f64 {
        self.solution.df_residual() as f64
    }

    fn covariance_matrix(&self, kind: VcovKind) -> DMatrix<f64> {
        match kind {
            VcovKind::Classical => classical_covariance(&self.solution),
            VcovKind::Hc0 => sandwich_covariance(&self.design, &self.solution, false),
            VcovKind::Hc1 => sandwich_covariance(&self.design, &self.solution, true),
        }
    }

    /// Total sum of squares (centered when the model has an intercept).
    fn tss(&self) -> f64 {
        if self.formula.intercept {
            let mean = self.response.mean();
            self.response.iter().map(|y| (y - mean) * (y - mean)).sum()
        } else {
            self.response.norm_squared()
        }
    }
}

impl TidyModel for LinearModel {
    fn tidy(&self, conf_level: f64) -> Result<Vec<TidyTerm>, AppError> {
        let cov = self.covariance_matrix(VcovKind::Classical);
        let df = Some(self.df_residual());
        let terms = self
            .coefficient_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let estimate = self.solution.beta[i];
                let std_error = cov[(i, i)].sqrt();
                let stat = estimate / std_error;
                let (lo, hi) = confidence_interval(estimate, std_error, conf_level, df);
                TidyTerm {
                    term: name.clone(),
                    estimate,
                    std_error,
                    statistic: Some(stat),
                    p_value: Some(pvalue(stat, df)),
                    conf_low: Some(lo),
                    conf_high: Some(hi),
                }
            })
            .collect();
        Ok(terms)
    }

    fn glance(&self) -> Result<Glance, AppError> {
        let n = self.solution.n as f64;
        let k = self.solution.k as f64;
        let rss = self.solution.rss();
        let tss = self.tss();
        let df_res = self.df_residual();
        let df_model = k - if self.formula.intercept { 1.0 } else { 0.0 };

        let r2 = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };
        let n_eff = n - if self.formula.intercept { 1.0 } else { 0.0 };
        let adj_r2 = 1.0 - (1.0 - r2) * n_eff / df_res;

        let log_lik = -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (rss / n).ln() + 1.0);
        // The residual variance counts as an estimated parameter.
        let n_params = k + 1.0;

        let mut glance = Glance::new()
            .with("r.squared", r2)
            .with("adj.r.squared", adj_r2)
            .with("sigma", self.solution.sigma2().sqrt());
        if df_model > 0.0 {
            let f = ((tss - rss) / df_model) / (rss / df_res);
            glance.push("statistic", f);
            glance.push("p.value", pvalue_f(f, df_model, df_res));
            glance.push("df", df_model);
        }
        glance.push("logLik", log_lik);
        glance.push("AIC", -2.0 * log_lik + 2.0 * n_params);
        glance.push("BIC", -2.0 * log_lik + n.ln() * n_params);
        glance.push("deviance", rss);
        glance.push("df.residual", df_res);
        glance.push("nobs", n);
        Ok(glance)
    }

    fn covariance(&self, kind: VcovKind) -> Option<Covariance> {
        Some(Covariance::new(
            self.coefficient_names.clone(),
            self.covariance_matrix(kind),
        ))
    }
}
