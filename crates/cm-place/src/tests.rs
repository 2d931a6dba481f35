//! Unit tests for cm-place.

use std::collections::HashSet;

use cm_core::{GeoPoint, OccupantId, Tick};

use crate::{Capacity, Place, PlaceKind};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn store(capacity: Capacity) -> Place {
    Place::new("store0", PlaceKind::Store, capacity, GeoPoint::new(45.50, -73.57), 0.6).unwrap()
}

fn sick(ids: &[u64]) -> HashSet<OccupantId> {
    ids.iter().map(|&i| OccupantId(i)).collect()
}

// ── Capacity ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod capacity {
    use crate::{Capacity, PlaceError};

    #[test]
    fn zero_rejected() {
        assert!(matches!(Capacity::limited(0), Err(PlaceError::InvalidCapacity(_))));
        assert_eq!(Capacity::limited(3).unwrap().get(), Some(3));
    }

    #[test]
    fn from_f64_cases() {
        assert_eq!(Capacity::from_f64(f64::INFINITY).unwrap(), Capacity::Unbounded);
        assert_eq!(Capacity::from_f64(30.0).unwrap().get(), Some(30));
        assert!(Capacity::from_f64(-1.0).is_err());
        assert!(Capacity::from_f64(0.0).is_err());
        assert!(Capacity::from_f64(2.5).is_err());
        assert!(Capacity::from_f64(f64::NAN).is_err());
        assert!(Capacity::from_f64(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn room_checks() {
        let two = Capacity::limited(2).unwrap();
        assert!(two.has_room(1));
        assert!(!two.has_room(2));
        assert!(two.allows(2));
        assert!(!two.allows(3));
        assert!(Capacity::Unbounded.has_room(usize::MAX - 1));
    }

    #[test]
    fn display() {
        assert_eq!(Capacity::limited(4).unwrap().to_string(), "4");
        assert_eq!(Capacity::Unbounded.to_string(), "unbounded");
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod occupancy {
    use super::*;
    use crate::{Admission, Occupancy, PlaceError};

    #[test]
    fn fifo_admission_and_promotion() {
        let nobody = sick(&[]);
        let mut occ = Occupancy::new(Capacity::limited(1).unwrap());

        assert_eq!(occ.request(OccupantId(1)).unwrap(), Admission::Granted);
        assert_eq!(occ.request(OccupantId(2)).unwrap(), Admission::Queued { position: 0 });
        assert_eq!(occ.request(OccupantId(3)).unwrap(), Admission::Queued { position: 1 });
        assert!(occ.is_full());

        // First come, first served.
        assert_eq!(occ.release(OccupantId(1), Tick(5), &nobody).unwrap(), Some(OccupantId(2)));
        assert!(occ.holds(OccupantId(2)));
        assert_eq!(occ.release(OccupantId(2), Tick(6), &nobody).unwrap(), Some(OccupantId(3)));
        assert_eq!(occ.release(OccupantId(3), Tick(7), &nobody).unwrap(), None);
        assert!(occ.is_empty());
    }

    #[test]
    fn no_queue_jumping_while_waiters_exist() {
        let nobody = sick(&[]);
        let mut occ = Occupancy::new(Capacity::limited(2).unwrap());
        occ.request(OccupantId(1)).unwrap();
        occ.request(OccupantId(2)).unwrap();
        occ.request(OccupantId(3)).unwrap(); // queued

        occ.release(OccupantId(1), Tick(0), &nobody).unwrap();
        assert!(occ.holds(OccupantId(3)));
        assert_eq!(occ.len(), 2);
    }

    #[test]
    fn duplicate_request_rejected() {
        let mut occ = Occupancy::new(Capacity::limited(1).unwrap());
        occ.request(OccupantId(1)).unwrap();
        occ.request(OccupantId(2)).unwrap();
        assert!(matches!(occ.request(OccupantId(1)), Err(PlaceError::AlreadyPresent(_))));
        assert!(matches!(occ.request(OccupantId(2)), Err(PlaceError::AlreadyPresent(_))));
    }

    #[test]
    fn release_by_stranger_fails() {
        let mut occ = Occupancy::new(Capacity::Unbounded);
        let result = occ.release(OccupantId(9), Tick(0), &sick(&[]));
        assert!(matches!(result, Err(PlaceError::NotOccupant(OccupantId(9)))));
    }

    #[test]
    fn abandon_from_queue_and_from_slot() {
        let nobody = sick(&[]);
        let mut occ = Occupancy::new(Capacity::limited(1).unwrap());
        occ.request(OccupantId(1)).unwrap();
        occ.request(OccupantId(2)).unwrap();
        occ.request(OccupantId(3)).unwrap();

        // Waiter 2 gives up; 3 moves to the head of the line.
        assert_eq!(occ.abandon(OccupantId(2), Tick(1), &nobody).unwrap(), None);
        assert_eq!(occ.waiting().collect::<Vec<_>>(), vec![OccupantId(3)]);

        // Holder 1 gives up; its slot goes to 3.
        assert_eq!(occ.abandon(OccupantId(1), Tick(2), &nobody).unwrap(), Some(OccupantId(3)));
        assert_eq!(occ.waiting_len(), 0);
    }

    #[test]
    fn infectious_departure_is_recorded() {
        let mut occ = Occupancy::new(Capacity::Unbounded);
        occ.request(OccupantId(1)).unwrap();
        occ.request(OccupantId(2)).unwrap();

        occ.release(OccupantId(1), Tick(3), &sick(&[])).unwrap();
        assert_eq!(occ.last_infectious_departure(), None);

        occ.release(OccupantId(2), Tick(8), &sick(&[2])).unwrap();
        assert_eq!(occ.last_infectious_departure(), Some(Tick(8)));
    }
}

// ── Place ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod place {
    use cm_core::CoreError;

    use super::*;
    use crate::{Occupiable, PlaceError};

    #[test]
    fn validation() {
        let pos = GeoPoint::new(0.0, 0.0);
        assert!(matches!(
            Place::new("  ", PlaceKind::Park, Capacity::Unbounded, pos, 0.1),
            Err(PlaceError::EmptyName)
        ));
        assert!(matches!(
            Place::new("p", PlaceKind::Park, Capacity::Unbounded, pos, 1.5),
            Err(PlaceError::InvalidProbability { .. })
        ));
        assert!(Place::new("p", PlaceKind::Park, Capacity::Unbounded, pos, f64::NAN).is_err());
    }

    #[test]
    fn off_map_positions_rejected() {
        let bad = [
            GeoPoint::new(f64::NAN, 0.0),
            GeoPoint::new(0.0, f64::NAN),
            GeoPoint::new(90.5, 0.0),
            GeoPoint::new(0.0, f64::INFINITY),
            GeoPoint::new(0.0, -180.5),
        ];
        for pos in bad {
            assert!(
                matches!(
                    Place::new("p", PlaceKind::Park, Capacity::Unbounded, pos, 0.1),
                    Err(PlaceError::Core(CoreError::InvalidCoordinate { .. }))
                ),
                "{pos:?} accepted"
            );
        }
        let edge = GeoPoint::new(-90.0, 180.0);
        assert!(Place::new("pole", PlaceKind::Park, Capacity::Unbounded, edge, 0.1).is_ok());
    }

    #[test]
    fn identity_is_the_name() {
        let a = store(Capacity::Unbounded);
        let b = Place::new("store0", PlaceKind::Misc, Capacity::Unbounded, GeoPoint::new(1.0, 1.0), 0.0)
            .unwrap();
        assert_eq!(a, b);

        let set: HashSet<Place> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn probability_is_flat_while_someone_is_sick() {
        let mut p = store(Capacity::Unbounded);
        let status = sick(&[2]);
        assert_eq!(p.interaction_probability(&status), 0.0);

        p.occupancy_mut().request(OccupantId(1)).unwrap();
        assert!(!p.has_sick_occupant(&status));
        assert_eq!(p.interaction_probability(&status), 0.0);

        p.occupancy_mut().request(OccupantId(2)).unwrap();
        assert!(p.has_sick_occupant(&status));
        assert_eq!(p.interaction_probability(&status), 0.6);

        // Drops straight back to zero once the sick occupant leaves.
        p.occupancy_mut().release(OccupantId(2), Tick(4), &status).unwrap();
        assert_eq!(p.interaction_probability(&status), 0.0);
    }

    #[test]
    fn summary_and_display() {
        let mut p = store(Capacity::limited(30).unwrap());
        p.occupancy_mut().request(OccupantId(7)).unwrap();
        assert_eq!(p.to_string(), "store:store0");
        assert_eq!(p.summary(&sick(&[7])), "store:store0 - occupants:1 - sick:true");
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Park".parse::<PlaceKind>().unwrap(), PlaceKind::Park);
        assert!(matches!("castle".parse::<PlaceKind>(), Err(PlaceError::UnknownKind(_))));
    }
}

// ── Exposure models ───────────────────────────────────────────────────────────

#[cfg(test)]
mod exposure {
    use super::*;
    use crate::{DecayingExposure, ExposureModel, FlatExposure, Occupiable};

    #[test]
    fn flat_matches_interaction_probability() {
        let mut p = store(Capacity::Unbounded);
        let status = sick(&[1]);
        p.occupancy_mut().request(OccupantId(1)).unwrap();
        assert_eq!(p.exposure_probability(Tick(0), &status, &FlatExposure), 0.6);

        p.occupancy_mut().release(OccupantId(1), Tick(0), &status).unwrap();
        assert_eq!(p.exposure_probability(Tick(10), &status, &FlatExposure), 0.0);
    }

    #[test]
    fn decay_halves_per_half_life() {
        let mut p = store(Capacity::Unbounded);
        let status = sick(&[1]);
        let model = DecayingExposure::new(0.0).with_kind(PlaceKind::Store, 4.0);

        p.occupancy_mut().request(OccupantId(1)).unwrap();
        p.occupancy_mut().release(OccupantId(1), Tick(10), &status).unwrap();

        let at = |t| p.exposure_probability(Tick(t), &status, &model);
        assert!((at(10) - 0.6).abs() < 1e-12);
        assert!((at(14) - 0.3).abs() < 1e-12);
        assert!((at(18) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn zero_half_life_is_flat() {
        let model = DecayingExposure::new(0.0);
        assert_eq!(model.probability(PlaceKind::Park, 0.5, false, Some(1)), 0.0);
        assert_eq!(model.probability(PlaceKind::Park, 0.5, true, None), 0.5);
    }

    #[test]
    fn never_exposed_is_zero() {
        let model = DecayingExposure::new(10.0);
        assert_eq!(model.probability(PlaceKind::Misc, 1.0, false, None), 0.0);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{Capacity, Occupiable, PlaceError, PlaceKind, load_places_reader};

    #[test]
    fn parses_rows() {
        let csv = "\
name,kind,capacity,lat,lon,probability
store0,store,30,45.5017,-73.5673,0.6
park0,park,,45.5100,-73.5540,0.05
household0,household,inf,45.4950,-73.5800,1.0
";
        let places = load_places_reader(Cursor::new(csv)).unwrap();
        assert_eq!(places.len(), 3);
        assert_eq!(places[0].name(), "store0");
        assert_eq!(places[0].capacity(), Capacity::limited(30).unwrap());
        assert_eq!(places[1].kind(), PlaceKind::Park);
        assert_eq!(places[1].capacity(), Capacity::Unbounded);
        assert_eq!(places[2].capacity(), Capacity::Unbounded);
        assert!((places[2].position().lat - 45.495).abs() < 1e-9);
    }

    #[test]
    fn negative_capacity_rejected() {
        let csv = "name,kind,capacity,lat,lon,probability\nx,store,-3,0,0,0.1\n";
        match load_places_reader(Cursor::new(csv)) {
            Err(PlaceError::Row { row: 1, source }) => {
                assert!(matches!(*source, PlaceError::InvalidCapacity(_)), "{source:?}")
            }
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn bad_number_reports_row() {
        let csv = "name,kind,capacity,lat,lon,probability\nx,store,3,0,0,0.1\ny,store,3,abc,0,0.1\n";
        match load_places_reader(Cursor::new(csv)) {
            Err(e @ PlaceError::Row { row: 2, .. }) => {
                assert!(e.to_string().starts_with("row 2: "), "{e}");
                assert!(matches!(e, PlaceError::Row { source, .. } if matches!(*source, PlaceError::Parse(_))));
            }
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn every_rejection_names_its_row() {
        let header = "name,kind,capacity,lat,lon,probability\n";
        let good = "ok,store,3,0,0,0.1\n";
        let bad_rows = [
            "zero,store,0,0,0,0.1\n",
            "risky,store,3,0,0,1.5\n",
            " ,store,3,0,0,0.1\n",
            "odd,castle,3,0,0,0.1\n",
            "north,store,3,91,0,0.1\n",
            "nowhere,store,3,NaN,0,0.1\n",
            "t,transit,3,0,0,0.1\n",
        ];
        for bad in bad_rows {
            let csv = format!("{header}{good}{bad}");
            match load_places_reader(Cursor::new(csv)) {
                Err(e @ PlaceError::Row { row: 2, .. }) => {
                    assert!(e.to_string().starts_with("row 2: "), "{e}")
                }
                other => panic!("{bad:?}: expected error on row 2, got {other:?}"),
            }
        }
    }

    #[test]
    fn transit_rows_rejected() {
        let csv = "name,kind,capacity,lat,lon,probability\nt,transit,3,0,0,0.1\n";
        match load_places_reader(Cursor::new(csv)) {
            Err(PlaceError::Row { row: 1, source }) => {
                assert!(matches!(*source, PlaceError::Parse(_)), "{source:?}")
            }
            other => panic!("expected row error, got {other:?}"),
        }
    }
}

// ── Sampler ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampler {
    use cm_core::SimRng;

    use crate::{Capacity, CityBounds, Occupiable, PlaceKind, PlaceSampler};

    fn bounds() -> CityBounds {
        CityBounds::new(45.40, 45.60, -73.70, -73.50).unwrap()
    }

    #[test]
    fn inverted_bounds_rejected() {
        assert!(CityBounds::new(45.6, 45.4, -73.7, -73.5).is_err());
    }

    #[test]
    fn places_inside_bounds_with_unique_names() {
        let mut s = PlaceSampler::new(SimRng::new(3), bounds());
        let mut places = s.sample_many(PlaceKind::Store, 20, Capacity::Unbounded, Some(0.6)).unwrap();
        places.extend(s.sample_many(PlaceKind::Store, 5, Capacity::Unbounded, None).unwrap());

        let names: std::collections::HashSet<_> = places.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names.len(), 25);
        assert_eq!(places[0].name(), "store0");
        assert_eq!(places[24].name(), "store24");
        assert!(places.iter().all(|p| bounds().contains(p.position())));
        assert!(places[..20].iter().all(|p| p.base_probability() == 0.6));
        assert!(places[20..].iter().all(|p| (0.0..1.0).contains(&p.base_probability())));
    }

    #[test]
    fn same_seed_same_city() {
        let draw = || {
            PlaceSampler::new(SimRng::new(11), bounds())
                .sample_many(PlaceKind::Misc, 10, Capacity::Unbounded, None)
                .unwrap()
                .iter()
                .map(|p| (p.position(), p.base_probability()))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(), draw());
    }

    #[test]
    fn jittered_capacities_positive_and_spread() {
        let mut s = PlaceSampler::new(SimRng::new(8), bounds());
        let stores = s.sample_jittered(PlaceKind::Store, 200, 30, Some(0.6)).unwrap();
        let caps: Vec<u32> = stores.iter().map(|p| p.capacity().get().unwrap()).collect();
        assert!(caps.iter().all(|&c| c >= 1));
        assert!(caps.iter().any(|&c| c < 25) && caps.iter().any(|&c| c > 35));
        let mean = caps.iter().sum::<u32>() as f64 / caps.len() as f64;
        assert!((mean - 30.0).abs() < 4.0, "mean {mean}");
        assert!(s.jittered_capacity(0).is_ok());
    }
}
