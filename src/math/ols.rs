//! Ordinary least squares and coefficient covariance estimators.
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - β is solved with SVD so tall design matrices work and near-collinear columns
//!   degrade gracefully. (Nalgebra's `QR::solve` is intended for square systems.)
//! - `(X^T X)^-1` is needed anyway for the covariance estimators, so a singular
//!   cross-product is reported as a failed fit.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Raw OLS solution plus the pieces the covariance estimators need.
#[derive(Debug, Clone)]
pub struct OlsSolution {
    pub beta: DVector<f64>,
    pub residuals: DVector<f64>,
    pub xtx_inv: DMatrix<f64>,
    pub n: usize,
    pub k: usize,
}

impl OlsSolution {
    pub fn rss(&self) -> f64 {
        self.residuals.norm_squared()
    }

    pub fn df_residual(&self) -> usize {
        self.n.saturating_sub(self.k)
    }

    /// Residual variance estimate `RSS / (n - k)`.
    pub fn sigma2(&self) -> f64 {
        let df = self.df_residual();
        if df == 0 {
            return f64::NAN;
        }
        self.rss() / df as f64
    }
}

/// Fit `y = X β + e`. `None` if the design is rank deficient.
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsSolution> {
    let (n, k) = x.shape();
    if n == 0 || k == 0 || y.len() != n {
        return None;
    }
    let beta = solve_least_squares(x, y)?;
    let xtx_inv = (x.transpose() * x).try_inverse()?;
    if xtx_inv.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let residuals = y - x * &beta;
    Some(OlsSolution {
        beta,
        residuals,
        xtx_inv,
        n,
        k,
    })
}

/// Classical covariance `σ² (X^T X)^-1`.
pub fn classical_covariance(sol: &OlsSolution) -> DMatrix<f64> {
    &sol.xtx_inv * sol.sigma2()
}

/// White's sandwich estimator `(X^T X)^-1 X^T diag(e²) X (X^T X)^-1`.
///
/// `small_sample` applies the HC1 correction `n / (n - k)`.
pub fn sandwich_covariance(x: &DMatrix<f64>, sol: &OlsSolution, small_sample: bool) -> DMatrix<f64> {
    let k = sol.k;
    let mut meat = DMatrix::<f64>::zeros(k, k);
    for (i, row) in x.row_iter().enumerate() {
        let e2 = sol.residuals[i] * sol.residuals[i];
        let r = row.transpose();
        meat += (&r * r.transpose()) * e2;
    }
    let mut cov = &sol.xtx_inv * meat * &sol.xtx_inv;
    if small_sample {
        let df = sol.df_residual();
        if df == 0 {
            return DMatrix::from_element(k, k, f64::NAN);
        }
        cov *= sol.n as f64 / df as f64;
    }
    cov
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn classical_covariance_matches_closed_form() {
        // Simple regression: Var(slope) = σ² / Σ(x - x̄)²
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [1.1, 2.9, 5.2, 6.8, 9.1];
        let mut data = Vec::new();
        for x in xs {
            data.push(1.0);
            data.push(x);
        }
        let x = DMatrix::from_row_slice(5, 2, &data);
        let y = DVector::from_row_slice(&ys);
        let sol = fit_ols(&x, &y).unwrap();
        let cov = classical_covariance(&sol);
        let sxx: f64 = xs.iter().map(|v| (v - 2.0) * (v - 2.0)).sum();
        assert_abs_diff_eq!(cov[(1, 1)], sol.sigma2() / sxx, epsilon = 1e-10);
        assert_eq!(sol.df_residual(), 3);
    }

    #[test]
    fn hc1_scales_hc0() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = DVector::from_row_slice(&[0.5, 2.5, 3.5, 6.5]);
        let sol = fit_ols(&x, &y).unwrap();
        let hc0 = sandwich_covariance(&x, &sol, false);
        let hc1 = sandwich_covariance(&x, &sol, true);
        assert_abs_diff_eq!(hc1[(0, 0)], hc0[(0, 0)] * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn rank_deficient_design_is_rejected() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(fit_ols(&x, &y).is_none());
    }
}
