//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  `SimClock` maps it to
//! calendar time:
//!
//!   timestamp = epoch + tick * minutes_per_tick
//!
//! The clock only interprets ticks.  Whoever drives the simulation (the
//! discrete-event scheduler) calls [`SimClock::advance`]; there is no way to
//! move the clock backwards.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike, Weekday};

use crate::{CoreError, CoreResult, SimRng};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`, saturating at `u64::MAX`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self`, or `None` if `earlier` is
    /// actually later.
    #[inline]
    pub fn since(self, earlier: Tick) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

/// Saturates at zero; use [`Tick::since`] to detect reversed operands.
impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0.saturating_sub(rhs.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts tick counts into calendar time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Calendar time of tick 0.
    epoch: NaiveDateTime,
    /// Simulated minutes per tick.  Never zero.
    minutes_per_tick: u32,
    /// The current tick.
    current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0.
    ///
    /// # Panics
    /// Panics if `minutes_per_tick` is zero; validate untrusted values with
    /// [`SimConfig::validate`] first.
    pub fn new(epoch: NaiveDateTime, minutes_per_tick: u32) -> Self {
        assert!(minutes_per_tick > 0, "minutes_per_tick must be positive");
        Self { epoch, minutes_per_tick, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.current_tick
    }

    #[inline]
    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }

    #[inline]
    pub fn minutes_per_tick(&self) -> u32 {
        self.minutes_per_tick
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    /// Advance the clock by `n` ticks.
    #[inline]
    pub fn advance_by(&mut self, n: u64) {
        self.current_tick = self.current_tick.offset(n);
    }

    /// Simulated minutes since tick 0.
    #[inline]
    pub fn elapsed_minutes(&self) -> u64 {
        self.current_tick.0.saturating_mul(self.minutes_per_tick as u64)
    }

    /// Calendar time of an arbitrary tick under this clock's epoch and
    /// resolution.
    ///
    /// Ticks past the end of chrono's calendar map to `NaiveDateTime::MAX`.
    pub fn timestamp_at(&self, tick: Tick) -> NaiveDateTime {
        let minutes = tick.0.saturating_mul(self.minutes_per_tick as u64);
        i64::try_from(minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .and_then(|delta| self.epoch.checked_add_signed(delta))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Calendar time of the current tick.
    #[inline]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp_at(self.current_tick)
    }

    pub fn minute(&self) -> u32 {
        self.timestamp().minute()
    }

    pub fn hour_of_day(&self) -> u32 {
        self.timestamp().hour()
    }

    pub fn day_of_week(&self) -> Weekday {
        self.timestamp().weekday()
    }

    /// `true` on Saturday and Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self.day_of_week(), Weekday::Sat | Weekday::Sun)
    }

    /// ISO-8601 rendering of the current timestamp, e.g.
    /// `2020-02-28T13:30:00`.
    pub fn time_of_day(&self) -> String {
        self.timestamp().format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    // ── Tick-count helpers ────────────────────────────────────────────────

    /// How many ticks span `minutes` minutes?  Rounds up.
    #[inline]
    pub fn ticks_for_minutes(&self, minutes: u64) -> u64 {
        minutes.div_ceil(self.minutes_per_tick as u64)
    }

    #[inline]
    pub fn ticks_for_hours(&self, hours: u64) -> u64 {
        self.ticks_for_minutes(hours.saturating_mul(60))
    }

    #[inline]
    pub fn ticks_for_days(&self, days: u64) -> u64 {
        self.ticks_for_minutes(days.saturating_mul(1_440))
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_tick, self.timestamp().format("%a %Y-%m-%d %H:%M"))
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level time and seeding configuration.
///
/// Built by the application (or deserialized with the `serde` feature) and
/// turned into a clock and RNG for the run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Calendar time of tick 0.
    pub start: NaiveDateTime,

    /// Simulated minutes per tick.
    pub minutes_per_tick: u32,

    /// Number of simulated days the run covers.
    pub simulation_days: u32,

    /// Master RNG seed.  The same seed always produces the same city.
    pub seed: u64,
}

impl SimConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.minutes_per_tick == 0 {
            return Err(CoreError::Config("minutes_per_tick must be positive".into()));
        }
        if 1_440 % self.minutes_per_tick != 0 {
            return Err(CoreError::Config(format!(
                "minutes_per_tick {} does not divide a day evenly",
                self.minutes_per_tick
            )));
        }
        Ok(())
    }

    /// The tick at which the run ends (exclusive upper bound).
    pub fn end_tick(&self) -> Tick {
        Tick(self.simulation_days as u64 * 1_440 / self.minutes_per_tick as u64)
    }

    /// Construct a `SimClock` for this run.
    pub fn make_clock(&self) -> CoreResult<SimClock> {
        self.validate()?;
        Ok(SimClock::new(self.start, self.minutes_per_tick))
    }

    /// Root RNG for this run.
    pub fn make_rng(&self) -> SimRng {
        SimRng::new(self.seed)
    }
}
