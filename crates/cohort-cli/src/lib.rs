//! CLI library components for the cohort explorer.

pub mod config;
pub mod logging;
