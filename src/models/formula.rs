//! Minimal model formulas: `response ~ term + term`.
//!
//! Supported: additive main effects, `- 1` / `+ 0` / `0 +` to drop the intercept.
//! Interactions and transformations are out of scope; precompute them as columns.

use std::str::FromStr;

use crate::error::AppError;

/// Name given to the constant column.
pub const INTERCEPT: &str = "(Intercept)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub response: String,
    pub terms: Vec<String>,
    pub intercept: bool,
}

impl Formula {
    /// Coefficient names in design-matrix order.
    pub fn coefficient_names(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.terms.len() + 1);
        if self.intercept {
            out.push(INTERCEPT.to_string());
        }
        out.extend(self.terms.iter().cloned());
        out
    }
}

impl FromStr for Formula {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lhs, rhs)) = s.split_once('~') else {
            return Err(AppError::validation(format!("formula '{s}' has no '~'")));
        };
        let response = lhs.trim();
        if response.is_empty() {
            return Err(AppError::validation(format!("formula '{s}' has no response")));
        }

        let mut intercept = true;
        let mut terms: Vec<String> = Vec::new();

        // Tokenize on +/- while remembering the sign in front of each token.
        let mut sign = '+';
        let mut token = String::new();
        let mut flush = |sign: char, token: &mut String| -> Result<(), AppError> {
            let t = token.trim().to_string();
            token.clear();
            match (sign, t.as_str()) {
                (_, "") => Err(AppError::validation(format!("formula '{s}' has an empty term"))),
                ('-', "1") | ('+', "0") => {
                    intercept = false;
                    Ok(())
                }
                ('+', "1") => Ok(()),
                ('-', other) => Err(AppError::validation(format!(
                    "formula '{s}': removing '{other}' is not supported"
                ))),
                (_, other) => {
                    if !terms.iter().any(|existing| existing == other) {
                        terms.push(other.to_string());
                    }
                    Ok(())
                }
            }
        };

        for ch in rhs.chars() {
            if ch == '+' || ch == '-' {
                flush(sign, &mut token)?;
                sign = ch;
            } else {
                token.push(ch);
            }
        }
        flush(sign, &mut token)?;

        if terms.is_empty() && !intercept {
            return Err(AppError::validation(format!("formula '{s}' has no terms")));
        }

        Ok(Formula {
            response: response.to_string(),
            terms,
            intercept,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_additive_terms() {
        let f: Formula = "mpg ~ wt + hp".parse().unwrap();
        assert_eq!(f.response, "mpg");
        assert_eq!(f.terms, vec!["wt", "hp"]);
        assert!(f.intercept);
        assert_eq!(f.coefficient_names(), vec!["(Intercept)", "wt", "hp"]);
    }

    #[test]
    fn drops_intercept() {
        let f: Formula = "y ~ x - 1".parse().unwrap();
        assert!(!f.intercept);
        let g: Formula = "y ~ 0 + x".parse().unwrap();
        assert!(!g.intercept);
        assert_eq!(g.terms, vec!["x"]);
    }

    #[test]
    fn rejects_malformed() {
        assert!("y x".parse::<Formula>().is_err());
        assert!(" ~ x".parse::<Formula>().is_err());
        assert!("y ~ x + ".parse::<Formula>().is_err());
        assert!("y ~ x - z".parse::<Formula>().is_err());
    }
}
