//! Input/output helpers.
//!
//! - numeric CSV datasets for the OLS adapter (`dataset`)
//! - coefficient / gof map files (`maps`)
//! - rendered table files (`export`)

pub mod dataset;
pub mod export;
pub mod maps;

pub use dataset::*;
pub use export::*;
pub use maps::*;
