//! Seeded randomness for city generation.
//!
//! Everything random in a run (place coordinates, capacities, interaction
//! probabilities) flows from one root seed in `SimConfig`.  Sub-tasks split
//! off independent streams with [`SimRng::split`], so adding a new consumer
//! does not shift the draws of existing ones as long as the split order is
//! fixed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Golden-ratio increment used to decorrelate split streams.
const STREAM_STEP: u64 = 0x9e37_79b9_7f4a_7c15;

/// Reproducible RNG for city generation.
///
/// Not `Sync`: split a stream per worker instead of sharing one.
pub struct SimRng {
    inner:  SmallRng,
    splits: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: SmallRng::seed_from_u64(seed), splits: 0 }
    }

    /// Derive an independent stream.  The n-th split of a given parent is
    /// the same for every run with the same seed.
    pub fn split(&mut self) -> SimRng {
        self.splits += 1;
        let seed = self.inner.r#gen::<u64>() ^ self.splits.wrapping_mul(STREAM_STEP);
        SimRng::new(seed)
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.inner.r#gen()
    }

    /// Uniform in `[lo, hi]`.  Returns `lo` when the interval is empty or
    /// degenerate.
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo { self.inner.gen_range(lo..=hi) } else { lo }
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen_bool(p.clamp(0.0, 1.0))
    }

    /// A normal draw rounded to the nearest integer (Box–Muller).
    ///
    /// Used to jitter venue capacities around a nominal value.
    pub fn discrete_gaussian(&mut self, mean: f64, std_dev: f64) -> i64 {
        // 1 - unit() lies in (0, 1], keeping ln() finite.
        let u1 = 1.0 - self.unit();
        let u2 = self.unit();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        (mean + std_dev.abs() * z).round() as i64
    }

    /// A uniformly chosen element, `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.inner.gen_range(0..items.len()))
    }
}
