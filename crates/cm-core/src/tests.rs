//! Unit tests for cm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ModeId, OccupantId, PlaceId, TransitId};

    #[test]
    fn from_index_roundtrip() {
        let id = PlaceId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PlaceId::from_index(42), Some(id));
    }

    #[test]
    fn from_index_rejects_overflow_and_sentinel() {
        assert_eq!(ModeId::from_index(70_000), None);
        assert_eq!(ModeId::from_index(u16::MAX as usize), None);
        assert_eq!(ModeId::from_index(u16::MAX as usize - 1), Some(ModeId(u16::MAX - 1)));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(PlaceId::INVALID.0, u32::MAX);
        assert_eq!(TransitId::INVALID.0, u32::MAX);
        assert_eq!(OccupantId::INVALID.0, u64::MAX);
        assert!(!PlaceId::INVALID.is_valid());
        assert!(PlaceId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(TransitId(7).to_string(), "transit#7");
        assert_eq!(OccupantId(3).to_string(), "occupant#3");
        assert_eq!(ModeId::INVALID.to_string(), "mode#invalid");
    }
}

#[cfg(test)]
mod geo {
    use crate::{CoreError, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(45.5017, -73.5673);
        assert!(p.distance_m(p) < 1e-6);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(45.0, -73.0);
        let b = GeoPoint::new(46.0, -73.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(45.50, -73.57);
        let b = GeoPoint::new(45.52, -73.60);
        assert!((a.distance_m(b) - b.distance_m(a)).abs() < 1e-9);
    }

    #[test]
    fn checked_rejects_garbage() {
        assert!(GeoPoint::checked(45.0, -73.0).is_ok());
        assert!(matches!(
            GeoPoint::checked(f64::NAN, 0.0),
            Err(CoreError::InvalidCoordinate { .. })
        ));
        assert!(GeoPoint::checked(91.0, 0.0).is_err());
        assert!(GeoPoint::checked(0.0, -181.0).is_err());
    }
}

#[cfg(test)]
mod time {
    use chrono::{NaiveDate, NaiveDateTime, Weekday};

    use crate::{SimClock, SimConfig, Tick};

    /// Friday 2020-02-28 00:00.
    fn epoch() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 2, 28)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(10)), Some(5));
        assert_eq!(Tick(10).since(Tick(15)), None);
    }

    #[test]
    fn tick_arithmetic_saturates() {
        assert_eq!(Tick(u64::MAX).offset(1), Tick(u64::MAX));
        assert_eq!(Tick(u64::MAX - 1) + 5, Tick(u64::MAX));
        assert_eq!(Tick(3) - Tick(10), 0);
    }

    #[test]
    fn far_future_clamps_to_calendar_end() {
        let mut clock = SimClock::new(epoch(), 15);
        clock.advance_by(1 << 40);
        assert_eq!(clock.timestamp(), NaiveDateTime::MAX);
        // The wall-clock accessors keep working past the calendar.
        let _ = clock.to_string();
        let _ = clock.is_weekend();

        clock.advance_by(u64::MAX);
        assert_eq!(clock.now(), Tick(u64::MAX));
        assert_eq!(clock.elapsed_minutes(), u64::MAX);
        assert_eq!(clock.timestamp(), NaiveDateTime::MAX);

        // Still exact one tick inside range.
        assert_eq!(clock.timestamp_at(Tick(4)), epoch() + chrono::TimeDelta::minutes(60));
    }

    #[test]
    fn timestamp_follows_ticks() {
        let mut clock = SimClock::new(epoch(), 15);
        assert_eq!(clock.timestamp(), epoch());
        clock.advance_by(6); // 90 minutes
        assert_eq!(clock.now(), Tick(6));
        assert_eq!(clock.hour_of_day(), 1);
        assert_eq!(clock.minute(), 30);
        assert_eq!(clock.elapsed_minutes(), 90);
        assert_eq!(clock.time_of_day(), "2020-02-28T01:30:00");
    }

    #[test]
    fn timestamp_at_is_pure() {
        let mut clock = SimClock::new(epoch(), 60);
        let before = clock.timestamp_at(Tick(30));
        clock.advance_by(10);
        assert_eq!(clock.timestamp_at(Tick(30)), before);
    }

    #[test]
    fn weekday_and_weekend() {
        let mut clock = SimClock::new(epoch(), 60);
        assert_eq!(clock.day_of_week(), Weekday::Fri);
        assert!(!clock.is_weekend());

        clock.advance_by(24); // 2020-02-29, leap day
        assert_eq!(clock.day_of_week(), Weekday::Sat);
        assert!(clock.is_weekend());

        clock.advance_by(24);
        assert_eq!(clock.day_of_week(), Weekday::Sun);
        assert!(clock.is_weekend());

        clock.advance_by(24);
        assert_eq!(clock.day_of_week(), Weekday::Mon);
        assert!(!clock.is_weekend());
    }

    #[test]
    fn ticks_for_duration() {
        let clock = SimClock::new(epoch(), 15);
        assert_eq!(clock.ticks_for_hours(1), 4);
        assert_eq!(clock.ticks_for_days(1), 96);
        // partial tick rounds up
        assert_eq!(clock.ticks_for_minutes(1), 1);
    }

    #[test]
    fn display_mentions_tick_and_date() {
        let clock = SimClock::new(epoch(), 60);
        assert_eq!(clock.to_string(), "T0 (Fri 2020-02-28 00:00)");
    }

    #[test]
    fn config_end_tick_and_validation() {
        let cfg = SimConfig {
            start:            epoch(),
            minutes_per_tick: 15,
            simulation_days:  30,
            seed:             0,
        };
        assert_eq!(cfg.end_tick(), Tick(30 * 96));
        assert!(cfg.make_clock().is_ok());

        let bad = SimConfig { minutes_per_tick: 7, ..cfg.clone() };
        assert!(bad.validate().is_err());
        let zero = SimConfig { minutes_per_tick: 0, ..cfg };
        assert!(zero.make_clock().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.unit(), r2.unit());
        }
    }

    #[test]
    fn splits_diverge_but_reproduce() {
        let mut root = SimRng::new(1);
        let (mut a, mut b) = (root.split(), root.split());
        assert_ne!(a.unit(), b.unit());

        let mut again = SimRng::new(1);
        let mut a2 = again.split();
        let mut a_fresh = SimRng::new(1).split();
        assert_eq!(a2.unit(), a_fresh.unit());
    }

    #[test]
    fn uniform_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.uniform(-73.6, -73.5);
            assert!((-73.6..=-73.5).contains(&v));
            assert!((0.0..1.0).contains(&rng.unit()));
        }
        assert_eq!(rng.uniform(2.0, 2.0), 2.0);
        assert_eq!(rng.uniform(3.0, 1.0), 3.0);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
        assert!(rng.chance(7.0));
    }

    #[test]
    fn discrete_gaussian_centred() {
        let mut rng = SimRng::new(5);
        let draws: Vec<i64> = (0..4000).map(|_| rng.discrete_gaussian(30.0, 15.0)).collect();
        let mean = draws.iter().sum::<i64>() as f64 / draws.len() as f64;
        assert!((mean - 30.0).abs() < 1.5, "mean {mean}");
        assert!(draws.iter().any(|&d| d < 15) && draws.iter().any(|&d| d > 45));
        assert_eq!(rng.discrete_gaussian(7.0, 0.0), 7);
    }

    #[test]
    fn pick_from_slice() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        let kinds = ["store", "park", "misc"];
        for _ in 0..50 {
            assert!(kinds.contains(rng.pick(&kinds).unwrap()));
        }
    }
}
