//! Mutex-guarded engine handle for concurrent callers.

use crate::engine::GridEngine;
use crate::snapshot::ExportedState;
use parking_lot::Mutex;
use std::sync::Arc;
use symgrid_core::{EngineConfig, Result};

/// Cloneable handle to the single live engine. Every call holds the lock
/// for its whole duration, so no caller observes a half-applied step.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<GridEngine>>,
}

impl SharedEngine {
    pub fn new(engine: GridEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(GridEngine::new(config)?))
    }

    /// Run `f` as one critical section
    pub fn with<R>(&self, f: impl FnOnce(&mut GridEngine) -> R) -> R {
        let mut engine = self.inner.lock();
        f(&mut engine)
    }

    pub fn export_state(&self) -> ExportedState {
        self.inner.lock().export_state()
    }
}
