//! The two seams between places and the agent model.
//!
//! - [`InfectionStatus`] is the only thing a place ever asks about its
//!   occupants.  The agent model keeps the full records.
//! - [`Occupiable`] is implemented by every entity with an occupancy queue:
//!   [`Place`](crate::Place) here and `Transit` in `cm-mobility`.

use std::collections::{BTreeSet, HashSet};

use cm_core::{OccupantId, Tick};

use crate::{Capacity, ExposureModel, Occupancy, PlaceKind};

// ── InfectionStatus ───────────────────────────────────────────────────────────

/// Answers "is this occupant currently infectious?".
pub trait InfectionStatus {
    fn is_infectious(&self, occupant: OccupantId) -> bool;
}

impl<T: InfectionStatus + ?Sized> InfectionStatus for &T {
    #[inline]
    fn is_infectious(&self, occupant: OccupantId) -> bool {
        (**self).is_infectious(occupant)
    }
}

/// A set of currently infectious occupants.
impl InfectionStatus for HashSet<OccupantId> {
    #[inline]
    fn is_infectious(&self, occupant: OccupantId) -> bool {
        self.contains(&occupant)
    }
}

impl InfectionStatus for BTreeSet<OccupantId> {
    #[inline]
    fn is_infectious(&self, occupant: OccupantId) -> bool {
        self.contains(&occupant)
    }
}

// ── Occupiable ────────────────────────────────────────────────────────────────

/// An entity agents can occupy: a capacity-limited, named location with an
/// interaction probability.
///
/// Implementors supply the identity and occupancy accessors; the contact
/// queries are provided.
pub trait Occupiable {
    fn name(&self) -> &str;

    fn kind(&self) -> PlaceKind;

    /// Interaction probability while an infectious occupant is present.
    fn base_probability(&self) -> f64;

    fn occupancy(&self) -> &Occupancy;

    fn occupancy_mut(&mut self) -> &mut Occupancy;

    #[inline]
    fn capacity(&self) -> Capacity {
        self.occupancy().capacity()
    }

    /// `true` if any current occupant is infectious.
    fn has_sick_occupant<S: InfectionStatus + ?Sized>(&self, status: &S) -> bool {
        self.occupancy().holders().any(|o| status.is_infectious(o))
    }

    /// Base probability while someone inside is infectious, else 0.
    ///
    /// Does not decay after the infectious occupant leaves and does not
    /// scale with head count; see [`exposure_probability`](Self::exposure_probability)
    /// for a model-driven alternative.
    fn interaction_probability<S: InfectionStatus + ?Sized>(&self, status: &S) -> f64 {
        if self.has_sick_occupant(status) {
            self.base_probability()
        } else {
            0.0
        }
    }

    /// Interaction probability under an [`ExposureModel`], which may account
    /// for the time since the last infectious occupant left.
    fn exposure_probability<S, M>(&self, now: Tick, status: &S, model: &M) -> f64
    where
        S: InfectionStatus + ?Sized,
        M: ExposureModel + ?Sized,
    {
        let since = self
            .occupancy()
            .last_infectious_departure()
            .and_then(|left| now.since(left));
        model.probability(self.kind(), self.base_probability(), self.has_sick_occupant(status), since)
    }

    /// One-line human-readable state, e.g. `store:store3 - occupants:4 - sick:false`.
    fn summary<S: InfectionStatus + ?Sized>(&self, status: &S) -> String {
        format!(
            "{}:{} - occupants:{} - sick:{}",
            self.kind(),
            self.name(),
            self.occupancy().len(),
            self.has_sick_occupant(status),
        )
    }
}
