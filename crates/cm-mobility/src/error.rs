//! Mobility-subsystem error type.

use cm_core::{ModeId, PlaceId};
use cm_place::PlaceError;
use thiserror::Error;

/// Errors produced by `cm-mobility`.
///
/// Unreachable destinations are *not* errors: the planner returns an empty
/// [`TripPlan`](crate::TripPlan) for those.
#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("duplicate place name {0:?}")]
    DuplicatePlace(String),

    #[error("duplicate mobility mode {0:?}")]
    DuplicateMode(String),

    #[error("mode registry is empty but {0} places need compatibility testing")]
    EmptyModeRegistry(usize),

    #[error("invalid mobility mode {name:?}: {reason}")]
    InvalidMode { name: String, reason: String },

    #[error("too many {what}: {count}")]
    TooMany { what: &'static str, count: usize },

    #[error("unknown mobility mode {0:?}")]
    UnknownMode(String),

    #[error("invalid preference weight {weight} for {mode}: expected a positive finite number")]
    InvalidPreference { mode: ModeId, weight: f64 },

    #[error("{0} not found in city graph")]
    PlaceNotFound(PlaceId),

    #[error("no place named {0:?} in city graph")]
    UnknownPlace(String),

    #[error(transparent)]
    Place(#[from] PlaceError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
