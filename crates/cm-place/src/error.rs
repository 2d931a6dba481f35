use cm_core::{CoreError, OccupantId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("invalid capacity: {0}")]
    InvalidCapacity(String),

    #[error("invalid {what} probability {value}: expected a finite value in [0, 1]")]
    InvalidProbability { what: &'static str, value: f64 },

    #[error("place name must not be empty")]
    EmptyName,

    #[error("unknown place kind {0:?}")]
    UnknownKind(String),

    #[error("invalid city bounds: {0}")]
    InvalidBounds(String),

    #[error("occupant {0} is already holding or waiting for this place")]
    AlreadyPresent(OccupantId),

    #[error("occupant {0} is neither holding nor waiting for this place")]
    NotOccupant(OccupantId),

    #[error("place parse error: {0}")]
    Parse(String),

    /// A CSV data row (1-based, header excluded) that failed to load.
    #[error("row {row}: {source}")]
    Row {
        row:    usize,
        #[source]
        source: Box<PlaceError>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlaceResult<T> = Result<T, PlaceError>;
