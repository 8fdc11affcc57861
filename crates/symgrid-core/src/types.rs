//! Core type definitions for the simulation.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ternary state of a single cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CellState {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl CellState {
    pub const ALL: [CellState; 3] = [CellState::Negative, CellState::Neutral, CellState::Positive];

    pub fn value(self) -> i8 {
        match self {
            CellState::Negative => -1,
            CellState::Neutral => 0,
            CellState::Positive => 1,
        }
    }
}

impl TryFrom<i64> for CellState {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(CellState::Negative),
            0 => Ok(CellState::Neutral),
            1 => Ok(CellState::Positive),
            other => Err(Error::InvalidCell(other)),
        }
    }
}

impl From<CellState> for i64 {
    fn from(state: CellState) -> Self {
        state.value() as i64
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Logical grid coordinate; may lie outside the grid and is wrapped on use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply toroidal wrapping for a square grid of the given side
    pub fn wrap(&self, size: usize) -> Self {
        let n = size as i64;
        Self {
            x: self.x.rem_euclid(n),
            y: self.y.rem_euclid(n),
        }
    }
}

/// The two neighbor-count thresholds that drive the transition rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub pos_threshold: u32,
    pub neg_threshold: u32,
}

impl Thresholds {
    pub fn new(pos_threshold: u32, neg_threshold: u32) -> Self {
        Self {
            pos_threshold,
            neg_threshold,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

/// Named seed pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// Every cell drawn uniformly from the three states
    Chaos,
    /// Single positive cell at the center
    Genesis,
    /// Anything else: full reset
    Clear,
}

impl From<&str> for SeedMode {
    fn from(mode: &str) -> Self {
        match mode {
            "chaos" => SeedMode::Chaos,
            "genesis" => SeedMode::Genesis,
            _ => SeedMode::Clear,
        }
    }
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedMode::Chaos => "chaos",
            SeedMode::Genesis => "genesis",
            SeedMode::Clear => "clear",
        };
        write!(f, "{}", name)
    }
}
