//! `ExposureModel`: how an entity's interaction probability evolves.
//!
//! The baseline, [`FlatExposure`], is an on/off switch: full base probability
//! while an infectious occupant is inside, zero otherwise.  Models that let
//! contamination linger after the infectious occupant leaves, at a rate that
//! depends on the kind of place, implement the same trait.

use std::collections::HashMap;

use crate::PlaceKind;

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Computes an interaction probability for one entity.
///
/// # Contract
///
/// - Must be pure and deterministic.
/// - Must return a value in `[0, base]`.
pub trait ExposureModel: Send + Sync {
    /// - `kind`: kind of the entity (transits report `PlaceKind::Transit`).
    /// - `base`: the entity's base interaction probability.
    /// - `sick_now`: an infectious occupant is currently inside.
    /// - `ticks_since_exposure`: ticks since the last infectious occupant
    ///   left, `None` if that never happened.
    fn probability(
        &self,
        kind:                 PlaceKind,
        base:                 f64,
        sick_now:             bool,
        ticks_since_exposure: Option<u64>,
    ) -> f64;
}

// ── Flat ──────────────────────────────────────────────────────────────────────

/// Base probability while someone infectious is inside, else zero.
#[derive(Copy, Clone, Debug, Default)]
pub struct FlatExposure;

impl ExposureModel for FlatExposure {
    #[inline]
    fn probability(&self, _kind: PlaceKind, base: f64, sick_now: bool, _since: Option<u64>) -> f64 {
        if sick_now { base } else { 0.0 }
    }
}

// ── Exponential decay ─────────────────────────────────────────────────────────

/// Contamination halves every `half_life` ticks after the last infectious
/// occupant leaves.
///
/// Half-lives are per place kind with a fallback.  A half-life of zero
/// disables lingering for that kind (flat behaviour).
#[derive(Clone, Debug)]
pub struct DecayingExposure {
    default_half_life: f64,
    by_kind:           HashMap<PlaceKind, f64>,
}

impl DecayingExposure {
    pub fn new(default_half_life_ticks: f64) -> Self {
        Self {
            default_half_life: default_half_life_ticks.max(0.0),
            by_kind:           HashMap::new(),
        }
    }

    /// Override the half-life for one kind of place.
    pub fn with_kind(mut self, kind: PlaceKind, half_life_ticks: f64) -> Self {
        self.by_kind.insert(kind, half_life_ticks.max(0.0));
        self
    }

    pub fn half_life(&self, kind: PlaceKind) -> f64 {
        self.by_kind.get(&kind).copied().unwrap_or(self.default_half_life)
    }
}

impl ExposureModel for DecayingExposure {
    fn probability(&self, kind: PlaceKind, base: f64, sick_now: bool, since: Option<u64>) -> f64 {
        if sick_now {
            return base;
        }
        let half_life = self.half_life(kind);
        match since {
            Some(elapsed) if half_life > 0.0 => base * 0.5f64.powf(elapsed as f64 / half_life),
            _ => 0.0,
        }
    }
}
