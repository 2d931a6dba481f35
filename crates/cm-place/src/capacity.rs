//! How many occupants an entity may hold at once.

use std::fmt;
use std::num::NonZeroU32;

use crate::{PlaceError, PlaceResult};

/// Occupant limit of a place or transit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capacity {
    /// At most this many simultaneous occupants.
    Limited(NonZeroU32),
    /// No limit (parks, households, open-air transit such as walking).
    #[default]
    Unbounded,
}

impl Capacity {
    /// A finite capacity.  Zero is rejected: an entity nobody can enter
    /// would deadlock every agent routed through it.
    pub fn limited(n: u32) -> PlaceResult<Self> {
        NonZeroU32::new(n)
            .map(Capacity::Limited)
            .ok_or_else(|| PlaceError::InvalidCapacity("capacity must be positive".into()))
    }

    /// Interpret a float from a config file or CSV column.
    ///
    /// `+inf` means unbounded; any other value must be a positive whole
    /// number that fits in `u32`.
    pub fn from_f64(value: f64) -> PlaceResult<Self> {
        if value == f64::INFINITY {
            return Ok(Capacity::Unbounded);
        }
        if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(PlaceError::InvalidCapacity(format!(
                "{value} is not a positive whole number or +inf"
            )));
        }
        Capacity::limited(value as u32)
    }

    /// The numeric limit, or `None` when unbounded.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self {
            Capacity::Limited(n) => Some(n.get()),
            Capacity::Unbounded  => None,
        }
    }

    /// `true` if one more occupant fits when `current` are already inside.
    #[inline]
    pub fn has_room(self, current: usize) -> bool {
        match self {
            Capacity::Limited(n) => current < n.get() as usize,
            Capacity::Unbounded  => true,
        }
    }

    /// `true` if `count` occupants are within the limit.
    #[inline]
    pub fn allows(self, count: usize) -> bool {
        match self {
            Capacity::Limited(n) => count <= n.get() as usize,
            Capacity::Unbounded  => true,
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Limited(n) => write!(f, "{n}"),
            Capacity::Unbounded  => f.write_str("unbounded"),
        }
    }
}
