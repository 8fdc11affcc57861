//! The grid engine: one mutable simulation state and its operations.

use crate::grid::Grid;
use crate::rule;
use crate::snapshot::{ExportedState, StateImport};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use symgrid_core::{
    check_grid_size, CellCounts, CellState, EngineConfig, Metrics, Position, Result, SeedMode,
    Thresholds,
};
use tracing::{debug, info, instrument};

/// What a single `step` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummary {
    pub step: u64,
    pub changed: usize,
    pub entropy: f64,
}

pub struct GridEngine {
    grid: Grid,
    step_count: u64,
    entropy_history: Vec<f64>,
    thresholds: Thresholds,
    max_size: usize,
    history_window: usize,
    rng: ChaCha8Rng,
}

impl GridEngine {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.check_size(config.size)?;

        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        info!(
            size = config.size,
            pos_threshold = config.pos_threshold,
            neg_threshold = config.neg_threshold,
            "Grid engine created"
        );

        Ok(Self::build(config, rng))
    }

    /// `config.size` must already have passed `check_size`
    fn build(config: &EngineConfig, rng: ChaCha8Rng) -> Self {
        Self {
            grid: Grid::new(config.size),
            step_count: 0,
            entropy_history: Vec::new(),
            thresholds: config.thresholds(),
            max_size: config.max_size,
            history_window: config.history_window,
            rng,
        }
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Read a cell, wrapping coordinates
    pub fn cell(&self, x: i64, y: i64) -> CellState {
        self.grid.get(Position::new(x, y))
    }

    /// Write a cell, wrapping coordinates. Values outside {-1, 0, 1} are rejected.
    pub fn set_cell(&mut self, x: i64, y: i64, value: i64) -> Result<()> {
        let state = CellState::try_from(value)?;
        self.grid.set(Position::new(x, y), state);
        debug!(x, y, value, "Cell set");
        Ok(())
    }

    /// Resize and reset. Thresholds are kept. Sizes of 0 or above the
    /// configured maximum are rejected and leave the grid untouched.
    pub fn set_size(&mut self, size: usize) -> Result<()> {
        check_grid_size(size, self.max_size)?;
        self.grid = Grid::new(size);
        self.reset();
        Ok(())
    }

    /// All-neutral grid, zero steps, empty history. Thresholds are kept.
    pub fn reset(&mut self) {
        self.grid = Grid::new(self.grid.size());
        self.step_count = 0;
        self.entropy_history.clear();
        info!(size = self.grid.size(), "Grid reset");
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// No range check: 0 always fires, anything above 8 never does.
    pub fn set_thresholds(&mut self, pos_threshold: u32, neg_threshold: u32) {
        self.thresholds = Thresholds::new(pos_threshold, neg_threshold);
        info!(pos_threshold, neg_threshold, "Thresholds updated");
    }

    /// Advance one generation with synchronous update
    #[instrument(skip(self), fields(step = self.step_count + 1, size = self.grid.size()))]
    pub fn step(&mut self) -> StepSummary {
        let (next, changed) = rule::next_generation(&self.grid, self.thresholds);
        self.grid = next;
        self.step_count += 1;

        let counts = self.counts();
        let entropy = counts.entropy();
        self.entropy_history.push(entropy);

        debug!(
            event = "step",
            step = self.step_count,
            changed,
            entropy,
            pos = counts.pos,
            neg = counts.neg,
            zero = counts.zero,
            "Generation advanced"
        );

        StepSummary {
            step: self.step_count,
            changed,
            entropy,
        }
    }

    pub fn counts(&self) -> CellCounts {
        self.grid.counts()
    }

    /// Shannon entropy in bits of the current grid
    pub fn entropy(&self) -> f64 {
        self.counts().entropy()
    }

    /// Trailing window of the entropy log, oldest first
    pub fn entropy_history(&self) -> &[f64] {
        let start = self.entropy_history.len().saturating_sub(self.history_window);
        &self.entropy_history[start..]
    }

    pub fn metrics(&self) -> Metrics {
        let counts = self.counts();
        Metrics {
            step: self.step_count,
            counts,
            entropy: counts.entropy(),
            entropy_history: self.entropy_history().to_vec(),
            size: self.grid.size(),
        }
    }

    /// Apply a seed pattern.
    ///
    /// `Chaos` and `Genesis` replace the cells only; step count and history
    /// survive. `Clear` is a full reset.
    #[instrument(skip(self))]
    pub fn set_seed(&mut self, mode: SeedMode) {
        let size = self.grid.size();
        match mode {
            SeedMode::Chaos => {
                let rng = &mut self.rng;
                self.grid = Grid::from_fn(size, |_, _| CellState::ALL[rng.gen_range(0..3)]);
            }
            SeedMode::Genesis => {
                let mut grid = Grid::new(size);
                let center = (size / 2) as i64;
                grid.set(Position::new(center, center), CellState::Positive);
                self.grid = grid;
            }
            SeedMode::Clear => {
                self.reset();
                return;
            }
        }
        info!(%mode, size, "Seed pattern applied");
    }

    pub fn export_state(&self) -> ExportedState {
        ExportedState {
            cells: self.grid.rows(),
            metrics: self.metrics(),
            pos_threshold: self.thresholds.pos_threshold,
            neg_threshold: self.thresholds.neg_threshold,
        }
    }

    /// Replace the state from a blob. Nothing is committed unless the whole
    /// blob validates.
    #[instrument(skip(self, state), fields(rows = state.rows()))]
    pub fn import_state(&mut self, state: StateImport) -> Result<()> {
        let grid = state.validated_grid(self.max_size)?;
        let metrics = state.metrics.unwrap_or_default();

        self.grid = grid;
        self.step_count = metrics.step.unwrap_or(0);
        self.entropy_history = metrics.entropy_history.unwrap_or_default();
        if let Some(pos) = state.pos_threshold {
            self.thresholds.pos_threshold = pos;
        }
        if let Some(neg) = state.neg_threshold {
            self.thresholds.neg_threshold = neg;
        }

        info!(
            size = self.grid.size(),
            step = self.step_count,
            pos_threshold = self.thresholds.pos_threshold,
            neg_threshold = self.thresholds.neg_threshold,
            "State imported"
        );
        Ok(())
    }

    pub fn import_json(&mut self, value: serde_json::Value) -> Result<()> {
        self.import_state(StateImport::from_json(value)?)
    }
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::build(&EngineConfig::default(), ChaCha8Rng::from_entropy())
    }
}
