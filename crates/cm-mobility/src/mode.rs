//! Mobility modes and per-query mode preferences.
//!
//! # Identity and ordering
//!
//! A mode is identified by its name.  [`ModeRegistry`] sorts modes by name
//! and hands out [`ModeId`]s in that order, so "lowest `ModeId`" and
//! "lexicographically first name" are the same thing.  The planner relies on
//! this to break cost ties deterministically.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use cm_core::ModeId;
use cm_place::{Capacity, validate_probability};

use crate::{MobilityError, MobilityResult};

const BUS_SEATS: NonZeroU32 = NonZeroU32::new(50).unwrap();
const CAR_SEATS: NonZeroU32 = NonZeroU32::new(5).unwrap();

// ── MobilityMode trait ────────────────────────────────────────────────────────

/// A way of travelling between two places.
///
/// # Contract
///
/// - `favorability_given_distance` is a cost proxy (lower is better), must be
///   finite and non-negative for every compatible distance, and should be
///   non-decreasing in distance.
/// - Both distance functions must be pure.
pub trait MobilityMode: Send + Sync {
    fn name(&self) -> &str;

    /// Occupant limit of every transit using this mode.
    fn capacity(&self) -> Capacity;

    /// Interaction probability of every transit using this mode.
    fn transmission_probability(&self) -> f64;

    /// Can this mode cover `distance_m` metres in one hop?
    fn is_compatible_with_distance(&self, distance_m: f64) -> bool;

    fn favorability_given_distance(&self, distance_m: f64) -> f64;
}

// ── ModeSpec ──────────────────────────────────────────────────────────────────

/// Table-driven [`MobilityMode`]: a distance window and an affine cost.
///
/// ```text
/// compatible(d)   = min_distance_m ≤ d ≤ max_distance_m
/// favorability(d) = fixed_cost + cost_per_km * d / 1000
/// ```
///
/// Costs are in arbitrary units; the presets use roughly "minutes".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeSpec {
    pub name:                     String,
    pub capacity:                 Capacity,
    pub transmission_probability: f64,
    pub min_distance_m:           f64,
    /// May be `f64::INFINITY`.
    pub max_distance_m:           f64,
    pub fixed_cost:               f64,
    pub cost_per_km:              f64,
}

impl ModeSpec {
    pub fn validate(&self) -> MobilityResult<()> {
        let invalid = |reason: String| MobilityError::InvalidMode {
            name: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".into()));
        }
        validate_probability("transmission", self.transmission_probability)?;
        if !(self.min_distance_m.is_finite() && self.min_distance_m >= 0.0) {
            return Err(invalid(format!("min_distance_m {} must be finite and >= 0", self.min_distance_m)));
        }
        if self.max_distance_m.is_nan() || self.max_distance_m < self.min_distance_m {
            return Err(invalid(format!(
                "max_distance_m {} must be >= min_distance_m {}",
                self.max_distance_m, self.min_distance_m
            )));
        }
        for (what, v) in [("fixed_cost", self.fixed_cost), ("cost_per_km", self.cost_per_km)] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(invalid(format!("{what} {v} must be finite and >= 0")));
            }
        }
        Ok(())
    }

    // ── Presets ───────────────────────────────────────────────────────────

    /// On foot: up to 2 km, ~12 min/km, open air.
    pub fn walking() -> Self {
        Self {
            name:                     "walking".into(),
            capacity:                 Capacity::Unbounded,
            transmission_probability: 0.01,
            min_distance_m:           0.0,
            max_distance_m:           2_000.0,
            fixed_cost:               0.0,
            cost_per_km:              12.0,
        }
    }

    /// Bicycle: up to 8 km, a couple of minutes to unlock and park.
    pub fn bicycle() -> Self {
        Self {
            name:                     "bicycle".into(),
            capacity:                 Capacity::Unbounded,
            transmission_probability: 0.0,
            min_distance_m:           0.0,
            max_distance_m:           8_000.0,
            fixed_cost:               2.0,
            cost_per_km:              4.0,
        }
    }

    /// City bus: 500 m to 30 km, waiting time dominates short hops.
    pub fn bus() -> Self {
        Self {
            name:                     "bus".into(),
            capacity:                 Capacity::Limited(BUS_SEATS),
            transmission_probability: 0.15,
            min_distance_m:           500.0,
            max_distance_m:           30_000.0,
            fixed_cost:               10.0,
            cost_per_km:              2.0,
        }
    }

    /// Private car: 1 km and up.
    pub fn car() -> Self {
        Self {
            name:                     "car".into(),
            capacity:                 Capacity::Limited(CAR_SEATS),
            transmission_probability: 0.05,
            min_distance_m:           1_000.0,
            max_distance_m:           f64::INFINITY,
            fixed_cost:               5.0,
            cost_per_km:              1.5,
        }
    }
}

impl MobilityMode for ModeSpec {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[inline]
    fn transmission_probability(&self) -> f64 {
        self.transmission_probability
    }

    #[inline]
    fn is_compatible_with_distance(&self, distance_m: f64) -> bool {
        (self.min_distance_m..=self.max_distance_m).contains(&distance_m)
    }

    #[inline]
    fn favorability_given_distance(&self, distance_m: f64) -> f64 {
        self.fixed_cost + self.cost_per_km * distance_m / 1_000.0
    }
}

// ── ModeRegistry ──────────────────────────────────────────────────────────────

/// The fixed set of modes available in a city, indexed by [`ModeId`].
pub struct ModeRegistry {
    /// Sorted by name; `modes[id.index()]` is mode `id`.
    modes: Vec<Box<dyn MobilityMode>>,
}

impl ModeRegistry {
    /// Register arbitrary modes.  Names must be unique and non-empty, and
    /// transmission probabilities must lie in `[0, 1]`.
    pub fn new(modes: impl IntoIterator<Item = Box<dyn MobilityMode>>) -> MobilityResult<Self> {
        let mut modes: Vec<Box<dyn MobilityMode>> = modes.into_iter().collect();
        if modes.len() > u16::MAX as usize {
            return Err(MobilityError::TooMany { what: "mobility modes", count: modes.len() });
        }
        for m in &modes {
            if m.name().trim().is_empty() {
                return Err(MobilityError::InvalidMode {
                    name:   String::new(),
                    reason: "name must not be empty".into(),
                });
            }
            validate_probability("transmission", m.transmission_probability())?;
        }
        modes.sort_by(|a, b| a.name().cmp(b.name()));
        if let Some(pair) = modes.windows(2).find(|w| w[0].name() == w[1].name()) {
            return Err(MobilityError::DuplicateMode(pair[0].name().to_string()));
        }
        Ok(Self { modes })
    }

    /// Register table-driven modes, validating each spec first.
    pub fn from_specs(specs: impl IntoIterator<Item = ModeSpec>) -> MobilityResult<Self> {
        let boxed = specs
            .into_iter()
            .map(|s| s.validate().map(|()| Box::new(s) as Box<dyn MobilityMode>))
            .collect::<MobilityResult<Vec<_>>>()?;
        Self::new(boxed)
    }

    /// `bicycle`, `bus`, `car`, `walking`.
    pub fn standard() -> Self {
        let modes: Vec<Box<dyn MobilityMode>> = vec![
            Box::new(ModeSpec::bicycle()),
            Box::new(ModeSpec::bus()),
            Box::new(ModeSpec::car()),
            Box::new(ModeSpec::walking()),
        ];
        debug_assert!(modes.windows(2).all(|w| w[0].name() < w[1].name()));
        Self { modes }
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn get(&self, id: ModeId) -> Option<&dyn MobilityMode> {
        self.modes.get(id.index()).map(|m| m.as_ref())
    }

    /// Like [`get`](Self::get) for ids handed out by this registry.
    ///
    /// # Panics
    /// Panics if `id` did not come from this registry.
    #[inline]
    pub fn mode(&self, id: ModeId) -> &dyn MobilityMode {
        self.modes[id.index()].as_ref()
    }

    pub fn id_of(&self, name: &str) -> Option<ModeId> {
        self.modes
            .binary_search_by(|m| m.name().cmp(name))
            .ok()
            .map(|i| ModeId(i as u16))
    }

    /// `(ModeId, mode)` pairs in id (= name) order.
    pub fn iter(&self) -> impl Iterator<Item = (ModeId, &dyn MobilityMode)> + '_ {
        self.modes
            .iter()
            .enumerate()
            .map(|(i, m)| (ModeId(i as u16), m.as_ref()))
    }

    /// Build a [`ModePreference`] from `(mode name, weight)` pairs.
    pub fn preference<'a>(
        &self,
        weights: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> MobilityResult<ModePreference> {
        let mut pref = ModePreference::new();
        for (name, weight) in weights {
            let id = self
                .id_of(name)
                .ok_or_else(|| MobilityError::UnknownMode(name.to_string()))?;
            pref.set(id, weight)?;
        }
        Ok(pref)
    }
}

impl std::fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.modes.iter().map(|m| m.name())).finish()
    }
}

// ── ModePreference ────────────────────────────────────────────────────────────

/// Per-query mode weights.
///
/// A mode's weight divides its favorability, so a larger weight makes the
/// mode cheaper.  Modes absent from the preference are never used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModePreference {
    weights: BTreeMap<ModeId, f64>,
}

impl ModePreference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight for `mode`.  Weights must be positive and finite.
    pub fn set(&mut self, mode: ModeId, weight: f64) -> MobilityResult<&mut Self> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(MobilityError::InvalidPreference { mode, weight });
        }
        self.weights.insert(mode, weight);
        Ok(self)
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, mode: ModeId, weight: f64) -> MobilityResult<Self> {
        self.set(mode, weight)?;
        Ok(self)
    }

    #[inline]
    pub fn weight(&self, mode: ModeId) -> Option<f64> {
        self.weights.get(&mode).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModeId, f64)> + '_ {
        self.weights.iter().map(|(&m, &w)| (m, w))
    }
}
