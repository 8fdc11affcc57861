//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid cell value: {0} (expected -1, 0 or 1)")]
    InvalidCell(i64),

    #[error("Invalid grid size: {0}")]
    InvalidSize(usize),

    #[error("Malformed state: {0}")]
    MalformedState(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidCell(5).to_string(),
            "Invalid cell value: 5 (expected -1, 0 or 1)"
        );
        assert_eq!(Error::InvalidSize(0).to_string(), "Invalid grid size: 0");
        assert_eq!(
            Error::MalformedState("grid is empty".into()).to_string(),
            "Malformed state: grid is empty"
        );
    }
}
