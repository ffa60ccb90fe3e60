//! Domain types shared by the summary pipeline and the renderers.
//!
//! This module defines:
//!
//! - option value types (`Statistic`, `CoefficientMap`, `GofMap`, `StarsSpec`, `OutputFormat`)
//! - the long-format rows produced per model (`TidyRow`)
//! - the merged wide table handed to the renderers (`AssembledTable`)

pub mod types;

pub use types::*;
