//! Configuration types for the simulation.

use crate::{Error, Result, Thresholds};
use serde::{Deserialize, Serialize};

/// Grid engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Side length of the square grid
    pub size: usize,
    /// Positive neighbor count needed to promote a cell
    pub pos_threshold: u32,
    /// Negative neighbor count needed to demote a cell
    pub neg_threshold: u32,
    /// Largest side length accepted by resize and import
    pub max_size: usize,
    /// Number of trailing entropy samples reported by metrics
    pub history_window: usize,
    /// Seed for the chaos pattern generator; OS entropy when unset
    pub rng_seed: Option<u64>,
}

impl EngineConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.pos_threshold, self.neg_threshold)
    }

    pub fn check_size(&self, size: usize) -> Result<usize> {
        check_grid_size(size, self.max_size)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: 100,
            pos_threshold: 3,
            neg_threshold: 3,
            max_size: 2048,
            history_window: 100,
            rng_seed: None,
        }
    }
}

/// Reject side lengths that are zero, above `max_size`, or whose cell
/// count does not fit in `usize`. Returns the cell count.
pub fn check_grid_size(size: usize, max_size: usize) -> Result<usize> {
    if size == 0 || size > max_size {
        return Err(Error::InvalidSize(size));
    }
    size.checked_mul(size).ok_or(Error::InvalidSize(size))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Engine created at startup
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Build from `SYMGRID_*` environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup("SYMGRID_BIND") {
            config.bind_address = bind;
        }
        if let Some(port) = lookup("SYMGRID_PORT") {
            config.port = parse_var("SYMGRID_PORT", &port)?;
        }
        if let Some(size) = lookup("SYMGRID_SIZE") {
            let size: usize = parse_var("SYMGRID_SIZE", &size)?;
            config.engine.size = size;
        }
        if let Some(max) = lookup("SYMGRID_MAX_SIZE") {
            config.engine.max_size = parse_var("SYMGRID_MAX_SIZE", &max)?;
        }
        if config.engine.check_size(config.engine.size).is_err() {
            return Err(Error::Config(format!(
                "SYMGRID_SIZE must be between 1 and {}",
                config.engine.max_size
            )));
        }
        if let Some(seed) = lookup("SYMGRID_SEED") {
            config.engine.rng_seed = Some(parse_var("SYMGRID_SEED", &seed)?);
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            engine: EngineConfig::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has invalid value {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_configs() {
        let engine = EngineConfig::default();
        assert_eq!(engine.size, 100);
        assert_eq!(engine.thresholds(), Thresholds::new(3, 3));
        assert_eq!(engine.max_size, 2048);
        assert_eq!(engine.history_window, 100);
        assert!(engine.rng_seed.is_none());

        let server = ServerConfig::default();
        assert_eq!(server.port, 8000);
    }

    #[test]
    fn test_server_config_from_lookup() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("SYMGRID_BIND", "127.0.0.1"),
            ("SYMGRID_PORT", "9000"),
            ("SYMGRID_SIZE", "32"),
            ("SYMGRID_SEED", "7"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.engine.size, 32);
        assert_eq!(config.engine.rng_seed, Some(7));
    }

    #[test]
    fn test_server_config_rejects_bad_values() {
        let err = ServerConfig::from_lookup(lookup_from(&[("SYMGRID_PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ServerConfig::from_lookup(lookup_from(&[("SYMGRID_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ServerConfig::from_lookup(lookup_from(&[
            ("SYMGRID_SIZE", "64"),
            ("SYMGRID_MAX_SIZE", "32"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_check_size_bounds() {
        let config = EngineConfig::default();
        assert_eq!(config.check_size(1).unwrap(), 1);
        assert_eq!(config.check_size(2048).unwrap(), 2048 * 2048);
        assert!(matches!(config.check_size(0), Err(Error::InvalidSize(0))));
        assert!(matches!(config.check_size(2049), Err(Error::InvalidSize(2049))));

        let unbounded = EngineConfig {
            max_size: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(
            unbounded.check_size(1usize << (usize::BITS / 2)),
            Err(Error::InvalidSize(_))
        ));
    }

    #[test]
    fn test_engine_config_serialization() {
        let config = EngineConfig {
            rng_seed: Some(42),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.size, config.size);
        assert_eq!(deserialized.rng_seed, Some(42));
    }
}
