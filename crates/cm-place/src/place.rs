//! `Place`: a named, capacity-limited location in the city.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use cm_core::GeoPoint;

use crate::{Capacity, Occupancy, Occupiable, PlaceError, PlaceResult};

// ── PlaceKind ─────────────────────────────────────────────────────────────────

/// What a location is used for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlaceKind {
    Household,
    Workplace,
    Store,
    Park,
    Misc,
    /// A journey between two places.  Only used by transits.
    Transit,
}

impl PlaceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceKind::Household => "household",
            PlaceKind::Workplace => "workplace",
            PlaceKind::Store     => "store",
            PlaceKind::Park      => "park",
            PlaceKind::Misc      => "misc",
            PlaceKind::Transit   => "transit",
        }
    }
}

impl fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceKind {
    type Err = PlaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "household" => Ok(PlaceKind::Household),
            "workplace" => Ok(PlaceKind::Workplace),
            "store"     => Ok(PlaceKind::Store),
            "park"      => Ok(PlaceKind::Park),
            "misc"      => Ok(PlaceKind::Misc),
            "transit"   => Ok(PlaceKind::Transit),
            _ => Err(PlaceError::UnknownKind(s.to_string())),
        }
    }
}

/// Check that `value` is a usable probability.
pub fn validate_probability(what: &'static str, value: f64) -> PlaceResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PlaceError::InvalidProbability { what, value })
    }
}

// ── Place ─────────────────────────────────────────────────────────────────────

/// A location agents can visit.
///
/// Identity is the name: two places with the same name compare equal and
/// hash alike.  `CityGraph` construction rejects duplicate names, so within
/// one graph name equality and id equality coincide.
#[derive(Clone, Debug)]
pub struct Place {
    name:             String,
    kind:             PlaceKind,
    position:         GeoPoint,
    base_probability: f64,
    occupancy:        Occupancy,
}

impl Place {
    pub fn new(
        name:             impl Into<String>,
        kind:             PlaceKind,
        capacity:         Capacity,
        position:         GeoPoint,
        base_probability: f64,
    ) -> PlaceResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlaceError::EmptyName);
        }
        let position = GeoPoint::checked(position.lat, position.lon)?;
        let base_probability = validate_probability("interaction", base_probability)?;
        Ok(Self {
            name,
            kind,
            position,
            base_probability,
            occupancy: Occupancy::new(capacity),
        })
    }

    #[inline]
    pub fn position(&self) -> GeoPoint {
        self.position
    }
}

impl Occupiable for Place {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn kind(&self) -> PlaceKind {
        self.kind
    }

    #[inline]
    fn base_probability(&self) -> f64 {
        self.base_probability
    }

    #[inline]
    fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    #[inline]
    fn occupancy_mut(&mut self) -> &mut Occupancy {
        &mut self.occupancy
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Place {}

impl Hash for Place {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}
