//! Configuration module for dpdk-preflight
//!
//! Provides CLI arguments, check thresholds, and runtime settings.

mod settings;

pub use settings::*;
