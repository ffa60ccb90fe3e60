//! Model adapters.
//!
//! The summary pipeline only talks to `TidyModel`; anything that can produce a
//! tidy coefficient table and a scalar goodness-of-fit summary can be tabulated.
//! Two adapters ship with the crate: an OLS fit on CSV data and a precomputed
//! model loaded from JSON.

pub mod adapter;
pub mod formula;
pub mod linear;
pub mod precomputed;

pub use adapter::*;
pub use formula::*;
pub use linear::*;
pub use precomputed::*;
