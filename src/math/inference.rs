//! Coefficient inference: test statistics, p-values and confidence intervals.
//!
//! When the residual degrees of freedom are known we use Student's t; otherwise
//! (e.g. a precomputed model that only reports standard errors) we fall back to
//! the standard normal.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};

/// Two-tailed p-value for a test statistic.
pub fn pvalue(stat: f64, df: Option<f64>) -> f64 {
    if !stat.is_finite() {
        return f64::NAN;
    }
    match df {
        Some(df) if df > 0.0 && df.is_finite() => match StudentsT::new(0.0, 1.0, df) {
            Ok(t) => 2.0 * (1.0 - t.cdf(stat.abs())),
            Err(_) => f64::NAN,
        },
        _ => match Normal::new(0.0, 1.0) {
            Ok(n) => 2.0 * (1.0 - n.cdf(stat.abs())),
            Err(_) => f64::NAN,
        },
    }
}

/// Two-sided critical value for the given confidence level.
pub fn critical_value(confidence: f64, df: Option<f64>) -> f64 {
    let q = 1.0 - (1.0 - confidence) / 2.0;
    match df {
        Some(df) if df > 0.0 && df.is_finite() => match StudentsT::new(0.0, 1.0, df) {
            Ok(t) => t.inverse_cdf(q),
            Err(_) => f64::NAN,
        },
        _ => match Normal::new(0.0, 1.0) {
            Ok(n) => n.inverse_cdf(q),
            Err(_) => f64::NAN,
        },
    }
}

/// Confidence interval `(low, high)` around an estimate.
pub fn confidence_interval(estimate: f64, std_error: f64, confidence: f64, df: Option<f64>) -> (f64, f64) {
    if !estimate.is_finite() || !std_error.is_finite() || std_error < 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let margin = critical_value(confidence, df) * std_error;
    (estimate - margin, estimate + margin)
}

/// Upper-tail p-value of an F statistic.
pub fn pvalue_f(f: f64, df1: f64, df2: f64) -> f64 {
    if !f.is_finite() || df1 <= 0.0 || df2 <= 0.0 {
        return f64::NAN;
    }
    match FisherSnedecor::new(df1, df2) {
        Ok(dist) => 1.0 - dist.cdf(f),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normal_pvalue_known_value() {
        assert_abs_diff_eq!(pvalue(1.96, None), 0.05, epsilon = 0.001);
        assert_abs_diff_eq!(pvalue(0.0, None), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn t_pvalue_is_wider_than_normal_for_small_df() {
        assert!(pvalue(2.0, Some(5.0)) > pvalue(2.0, None));
        assert_abs_diff_eq!(pvalue(-2.0, Some(5.0)), pvalue(2.0, Some(5.0)), epsilon = 1e-12);
    }

    #[test]
    fn normal_interval_95() {
        let (lo, hi) = confidence_interval(1.0, 0.5, 0.95, None);
        assert_abs_diff_eq!(lo, 1.0 - 1.96 * 0.5, epsilon = 0.01);
        assert_abs_diff_eq!(hi, 1.0 + 1.96 * 0.5, epsilon = 0.01);
    }

    #[test]
    fn wider_level_gives_wider_interval() {
        let (lo95, hi95) = confidence_interval(0.0, 1.0, 0.95, Some(20.0));
        let (lo99, hi99) = confidence_interval(0.0, 1.0, 0.99, Some(20.0));
        assert!(lo99 < lo95 && hi99 > hi95);
    }

    #[test]
    fn large_df_still_uses_student_t() {
        let t = StudentsT::new(0.0, 1.0, 2000.0).unwrap();
        let crit = t.inverse_cdf(0.995);
        let (lo, hi) = confidence_interval(0.0, 1.0, 0.99, Some(2000.0));
        assert_abs_diff_eq!(hi, crit, epsilon = 1e-9);
        assert_abs_diff_eq!(lo, -crit, epsilon = 1e-9);
        assert!(hi > 2.577);
        assert_abs_diff_eq!(pvalue(2.5, Some(2000.0)), 2.0 * (1.0 - t.cdf(2.5)), epsilon = 1e-12);
    }

    #[test]
    fn f_pvalue_bounds() {
        let p = pvalue_f(10.0, 2.0, 30.0);
        assert!(p > 0.0 && p < 0.01);
        assert!(pvalue_f(f64::NAN, 2.0, 30.0).is_nan());
    }
}
