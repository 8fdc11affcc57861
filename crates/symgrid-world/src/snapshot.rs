//! Exported state blobs and validated import.

use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;
use symgrid_core::{check_grid_size, CellState, Error, Metrics, Result};

/// Full exported state: grid, metrics and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedState {
    /// Row-major matrix, `cells[y][x]`
    pub cells: Vec<Vec<CellState>>,
    pub metrics: Metrics,
    pub pos_threshold: u32,
    pub neg_threshold: u32,
}

/// Metric fields honored on import; derived values are recomputed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportedMetrics {
    pub step: Option<u64>,
    pub entropy_history: Option<Vec<f64>>,
}

/// A matrix entry as sent by the client. Integral floats such as `1.0` are
/// accepted alongside plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Int(i64),
    Float(f64),
}

impl RawCell {
    fn to_state(self) -> Option<CellState> {
        let value = match self {
            RawCell::Int(v) => v,
            RawCell::Float(f) if f.fract() == 0.0 && f.abs() <= 1.0 => f as i64,
            RawCell::Float(_) => return None,
        };
        CellState::try_from(value).ok()
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Int(v) => write!(f, "{}", v),
            RawCell::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Inbound state blob. The matrix is read from `cells`, or from `grid` (the
/// key older clients send) when `cells` is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct StateImport {
    #[serde(default)]
    pub cells: Option<Vec<Vec<RawCell>>>,
    #[serde(default)]
    pub grid: Option<Vec<Vec<RawCell>>>,
    #[serde(default)]
    pub metrics: Option<ImportedMetrics>,
    #[serde(default)]
    pub pos_threshold: Option<u32>,
    #[serde(default)]
    pub neg_threshold: Option<u32>,
}

impl StateImport {
    /// Parse an arbitrary JSON value, reporting any shape problem as malformed state
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::MalformedState(e.to_string()))
    }

    pub fn matrix(&self) -> Option<&Vec<Vec<RawCell>>> {
        self.cells.as_ref().or(self.grid.as_ref())
    }

    pub fn rows(&self) -> usize {
        self.matrix().map_or(0, Vec::len)
    }

    /// Check the matrix is present, square, ternary and at most `max_size`
    /// on a side, and build the grid
    pub(crate) fn validated_grid(&self, max_size: usize) -> Result<Grid> {
        let matrix = self
            .matrix()
            .ok_or_else(|| Error::MalformedState("state has no cells".to_string()))?;

        let size = matrix.len();
        if size == 0 {
            return Err(Error::MalformedState("grid has no rows".to_string()));
        }
        check_grid_size(size, max_size)?;

        let mut rows = Vec::with_capacity(size);
        for (y, row) in matrix.iter().enumerate() {
            if row.len() != size {
                return Err(Error::MalformedState(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    size
                )));
            }

            let states = row
                .iter()
                .enumerate()
                .map(|(x, &raw)| {
                    raw.to_state().ok_or_else(|| {
                        Error::MalformedState(format!("cell ({}, {}) has value {}", x, y, raw))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(states);
        }

        Ok(Grid::from_rows(rows))
    }
}

impl From<ExportedState> for StateImport {
    fn from(state: ExportedState) -> Self {
        Self {
            cells: Some(
                state
                    .cells
                    .into_iter()
                    .map(|row| row.into_iter().map(|c| RawCell::Int(c.into())).collect())
                    .collect(),
            ),
            grid: None,
            metrics: Some(ImportedMetrics {
                step: Some(state.metrics.step),
                entropy_history: Some(state.metrics.entropy_history),
            }),
            pos_threshold: Some(state.pos_threshold),
            neg_threshold: Some(state.neg_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAX: usize = 64;

    #[test]
    fn test_minimal_import_parses() {
        let import = StateImport::from_json(json!({ "cells": [[0, 1], [-1, 0]] })).unwrap();
        assert!(import.metrics.is_none());
        assert!(import.pos_threshold.is_none());

        let grid = import.validated_grid(MAX).unwrap();
        assert_eq!(grid.size(), 2);
    }

    #[test]
    fn test_grid_key_fallback() {
        let import = StateImport::from_json(json!({
            "grid": [[1]],
            "metrics": { "step": 4, "entropy": 0.0, "counts": { "pos": 1 } }
        }))
        .unwrap();
        assert_eq!(import.rows(), 1);
        assert_eq!(import.metrics.clone().unwrap().step, Some(4));
        assert_eq!(import.validated_grid(MAX).unwrap().counts().pos, 1);
    }

    #[test]
    fn test_cells_preferred_over_grid() {
        let import = StateImport::from_json(json!({
            "cells": [[-1]],
            "grid": [[1]]
        }))
        .unwrap();
        assert_eq!(import.validated_grid(MAX).unwrap().counts().neg, 1);
    }

    #[test]
    fn test_integral_floats_accepted() {
        let import = StateImport::from_json(json!({ "cells": [[1.0, 0.0], [-1.0, 0]] })).unwrap();
        let counts = import.validated_grid(MAX).unwrap().counts();
        assert_eq!((counts.pos, counts.neg, counts.zero), (1, 1, 2));

        let import = StateImport::from_json(json!({ "cells": [[0.5]] })).unwrap();
        match import.validated_grid(MAX) {
            Err(Error::MalformedState(msg)) => assert_eq!(msg, "cell (0, 0) has value 0.5"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_is_malformed() {
        let err = StateImport::from_json(json!({ "cells": [["a"]] })).unwrap_err();
        assert!(matches!(err, Error::MalformedState(_)));

        let import = StateImport::from_json(json!({ "metrics": {} })).unwrap();
        assert!(matches!(import.validated_grid(MAX), Err(Error::MalformedState(_))));
    }

    #[test]
    fn test_shape_validation() {
        let empty = StateImport::from_json(json!({ "cells": [] })).unwrap();
        assert!(matches!(empty.validated_grid(MAX), Err(Error::MalformedState(_))));

        let ragged = StateImport::from_json(json!({ "cells": [[0, 0], [0]] })).unwrap();
        assert!(matches!(ragged.validated_grid(MAX), Err(Error::MalformedState(_))));

        let wide = StateImport::from_json(json!({ "cells": [[0, 0, 0], [0, 0, 0]] })).unwrap();
        assert!(matches!(wide.validated_grid(MAX), Err(Error::MalformedState(_))));
    }

    #[test]
    fn test_oversize_matrix_rejected() {
        let import = StateImport::from_json(json!({ "cells": [[0, 0], [0, 0]] })).unwrap();
        assert!(matches!(import.validated_grid(1), Err(Error::InvalidSize(2))));
    }

    #[test]
    fn test_out_of_range_value_is_malformed() {
        let import = StateImport::from_json(json!({ "cells": [[0, 2], [0, 0]] })).unwrap();
        match import.validated_grid(MAX) {
            Err(Error::MalformedState(msg)) => assert_eq!(msg, "cell (1, 0) has value 2"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
