//! Grid simulation engine.
//!
//! A square toroidal grid of ternary cells evolved by a threshold vote over
//! the 8-cell Moore neighborhood.

pub mod grid;
pub mod rule;
pub mod engine;
pub mod snapshot;
pub mod shared;

pub use grid::Grid;
pub use rule::{NeighborTally, Transition};
pub use engine::{GridEngine, StepSummary};
pub use snapshot::{ExportedState, ImportedMetrics, RawCell, StateImport};
pub use shared::SharedEngine;
