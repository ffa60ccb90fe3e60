//! Numerical helpers for the built-in linear model adapter.

pub mod inference;
pub mod ols;

pub use inference::*;
pub use ols::*;
