//! Population statistics and entropy for a grid generation.

use crate::CellState;
use serde::{Deserialize, Serialize};

/// Number of cells in each state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    pub pos: usize,
    pub neg: usize,
    pub zero: usize,
}

impl CellCounts {
    /// Tally an iterator of cell states
    pub fn tally<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a CellState>,
    {
        let mut counts = Self::default();
        for cell in cells {
            counts.record(*cell);
        }
        counts
    }

    pub fn record(&mut self, state: CellState) {
        match state {
            CellState::Positive => self.pos += 1,
            CellState::Negative => self.neg += 1,
            CellState::Neutral => self.zero += 1,
        }
    }

    pub fn get(&self, state: CellState) -> usize {
        match state {
            CellState::Positive => self.pos,
            CellState::Negative => self.neg,
            CellState::Neutral => self.zero,
        }
    }

    pub fn total(&self) -> usize {
        self.pos + self.neg + self.zero
    }

    /// Shannon entropy in bits of the state distribution.
    ///
    /// States with zero count contribute nothing, so a uniform grid scores 0
    /// and the maximum is log2(3).
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        let total = total as f64;
        CellState::ALL
            .iter()
            .map(|&state| self.get(state))
            .filter(|&count| count > 0)
            .map(|count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}

/// Metrics snapshot for the current generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub step: u64,
    pub counts: CellCounts,
    pub entropy: f64,
    /// Trailing entropy samples, oldest first
    pub entropy_history: Vec<f64>,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_entropy_is_zero() {
        let counts = CellCounts { pos: 0, neg: 0, zero: 25 };
        assert_eq!(counts.entropy(), 0.0);

        let counts = CellCounts { pos: 9, neg: 0, zero: 0 };
        assert_eq!(counts.entropy(), 0.0);
    }

    #[test]
    fn test_entropy_values() {
        let counts = CellCounts { pos: 2, neg: 0, zero: 2 };
        assert!((counts.entropy() - 1.0).abs() < 1e-12);

        let counts = CellCounts { pos: 3, neg: 3, zero: 3 };
        assert!((counts.entropy() - 3f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn test_tally() {
        let cells = [
            CellState::Positive,
            CellState::Neutral,
            CellState::Negative,
            CellState::Positive,
        ];
        let counts = CellCounts::tally(&cells);
        assert_eq!(counts, CellCounts { pos: 2, neg: 1, zero: 1 });
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_empty_counts() {
        assert_eq!(CellCounts::default().entropy(), 0.0);
    }
}
