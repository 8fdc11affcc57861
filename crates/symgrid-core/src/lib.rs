//! Core types and utilities for the symbolic grid simulation.

pub mod types;
pub mod config;
pub mod error;
pub mod metrics;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use metrics::*;
