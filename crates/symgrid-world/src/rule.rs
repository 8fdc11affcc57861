//! Threshold vote transition rule.

use crate::grid::Grid;
use symgrid_core::{CellState, Position, Thresholds};

/// Positive and negative neighbor counts for one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborTally {
    pub pos: u32,
    pub neg: u32,
}

impl NeighborTally {
    pub fn of(grid: &Grid, pos: Position) -> Self {
        let mut tally = Self::default();
        for neighbor in grid.neighbors(pos) {
            match neighbor {
                CellState::Positive => tally.pos += 1,
                CellState::Negative => tally.neg += 1,
                CellState::Neutral => {}
            }
        }
        tally
    }
}

/// Outcome of the rule for a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Enough positive neighbors: becomes positive
    Promote,
    /// Enough negative neighbors: becomes negative
    Demote,
    /// Neither threshold met: keeps its state
    Preserve,
}

impl Transition {
    /// Promotion wins when both thresholds are met.
    pub fn decide(tally: NeighborTally, thresholds: Thresholds) -> Self {
        if tally.pos >= thresholds.pos_threshold {
            Transition::Promote
        } else if tally.neg >= thresholds.neg_threshold {
            Transition::Demote
        } else {
            Transition::Preserve
        }
    }

    pub fn apply(self, current: CellState) -> CellState {
        match self {
            Transition::Promote => CellState::Positive,
            Transition::Demote => CellState::Negative,
            Transition::Preserve => current,
        }
    }
}

/// Compute the next generation from a read-only snapshot.
///
/// Returns the new grid and the number of cells whose state changed.
pub fn next_generation(grid: &Grid, thresholds: Thresholds) -> (Grid, usize) {
    let mut changed = 0;
    let cells = grid
        .iter()
        .map(|(pos, current)| {
            let state = Transition::decide(NeighborTally::of(grid, pos), thresholds).apply(current);
            if state != current {
                changed += 1;
            }
            state
        })
        .collect();
    let next = Grid::from_cells(grid.size(), cells);
    (next, changed)
}
