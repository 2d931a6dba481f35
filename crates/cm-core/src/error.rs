//! Shared error type for `cm-core`.
//!
//! Sub-crates define their own enums (`PlaceError`, `MobilityError`) and
//! wrap this one through a `#[from]` variant where they need to.

use thiserror::Error;

/// Errors raised while validating core configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Shorthand result type for `cm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
