//! `Transit`: a directed, mode-specific journey between two places.
//!
//! Transits are edge payloads of the [`CityGraph`](crate::CityGraph), but
//! they are also occupiable: a bus ride from A to B has seats, holders, and a
//! queue, exactly like a store.  Both sides implement
//! [`Occupiable`](cm_place::Occupiable); a transit refers to its endpoints
//! and mode by id only.

use std::fmt;

use cm_core::{ModeId, PlaceId, TransitId};
use cm_place::{Occupancy, Occupiable, PlaceKind};

use crate::MobilityMode;

/// One direction of travel between two places with one mode.
///
/// A→B and B→A are distinct transits with separate occupancy.
#[derive(Clone, Debug)]
pub struct Transit {
    id:               TransitId,
    source:           PlaceId,
    destination:      PlaceId,
    mode:             ModeId,
    /// `"{source}--({mode})-->{destination}"`.
    name:             String,
    distance_m:       f64,
    base_probability: f64,
    occupancy:        Occupancy,
}

impl Transit {
    /// Build a transit, taking capacity and interaction probability from
    /// `mode_spec`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id:               TransitId,
        source:           PlaceId,
        source_name:      &str,
        destination:      PlaceId,
        destination_name: &str,
        mode:             ModeId,
        mode_spec:        &dyn MobilityMode,
        distance_m:       f64,
    ) -> Self {
        Self {
            id,
            source,
            destination,
            mode,
            name: format!("{source_name}--({})-->{destination_name}", mode_spec.name()),
            distance_m,
            base_probability: mode_spec.transmission_probability(),
            occupancy: Occupancy::new(mode_spec.capacity()),
        }
    }

    #[inline]
    pub fn id(&self) -> TransitId {
        self.id
    }

    #[inline]
    pub fn source(&self) -> PlaceId {
        self.source
    }

    #[inline]
    pub fn destination(&self) -> PlaceId {
        self.destination
    }

    #[inline]
    pub fn mode(&self) -> ModeId {
        self.mode
    }

    /// Great-circle distance between the endpoints, metres.
    #[inline]
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }
}

impl Occupiable for Transit {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn kind(&self) -> PlaceKind {
        PlaceKind::Transit
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

impl fmt::Display for Transit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transit:{}", self.name)
    }
}
