//! `model-summary` library crate.
//!
//! The binary (`msum`) is a thin wrapper around this library so that:
//!
//! - tables can be built from code without spawning processes
//! - any model type can be tabulated by implementing `models::TidyModel`

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod summary;

pub use summary::model_summary;
