//! Seeded random placement of places inside a bounding box.
//!
//! Used to build synthetic cities for experiments and tests.  Names are
//! `"{kind}{n}"` with a per-kind counter, so one sampler never issues the
//! same name twice.

use std::collections::HashMap;

use cm_core::{GeoPoint, SimRng};

use crate::{Capacity, Place, PlaceError, PlaceKind, PlaceResult, validate_probability};

/// Rectangular lat/lon extent of a city.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityBounds {
    pub south: f64,
    pub north: f64,
    pub west:  f64,
    pub east:  f64,
}

impl CityBounds {
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> PlaceResult<Self> {
        GeoPoint::checked(south, west)?;
        GeoPoint::checked(north, east)?;
        if south >= north || west >= east {
            return Err(PlaceError::InvalidBounds(format!(
                "expected south < north and west < east, got lat {south}..{north}, lon {west}..{east}"
            )));
        }
        Ok(Self { south, north, west, east })
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.south..=self.north).contains(&p.lat) && (self.west..=self.east).contains(&p.lon)
    }
}

/// Draws places uniformly inside [`CityBounds`].
pub struct PlaceSampler {
    rng:    SimRng,
    bounds: CityBounds,
    issued: HashMap<PlaceKind, u32>,
}

impl PlaceSampler {
    pub fn new(rng: SimRng, bounds: CityBounds) -> Self {
        Self { rng, bounds, issued: HashMap::new() }
    }

    /// Draw one place.
    ///
    /// `probability = None` draws the interaction probability uniformly from
    /// `[0, 1)`.
    pub fn sample(
        &mut self,
        kind:        PlaceKind,
        capacity:    Capacity,
        probability: Option<f64>,
    ) -> PlaceResult<Place> {
        let probability = match probability {
            Some(p) => validate_probability("interaction", p)?,
            None    => self.rng.unit(),
        };
        let lat = self.rng.uniform(self.bounds.south, self.bounds.north);
        let lon = self.rng.uniform(self.bounds.west, self.bounds.east);

        let n = self.issued.entry(kind).or_insert(0);
        let name = format!("{kind}{n}");
        *n += 1;

        Place::new(name, kind, capacity, GeoPoint::new(lat, lon), probability)
    }

    /// Draw `count` places of the same kind.
    pub fn sample_many(
        &mut self,
        kind:        PlaceKind,
        count:       usize,
        capacity:    Capacity,
        probability: Option<f64>,
    ) -> PlaceResult<Vec<Place>> {
        (0..count).map(|_| self.sample(kind, capacity, probability)).collect()
    }

    /// A limited capacity drawn around `nominal` with standard deviation
    /// `nominal / 2`, never below one seat.
    pub fn jittered_capacity(&mut self, nominal: u32) -> PlaceResult<Capacity> {
        let draw = self.rng.discrete_gaussian(nominal as f64, nominal as f64 * 0.5);
        Capacity::limited(draw.clamp(1, u32::MAX as i64) as u32)
    }

    /// Draw `count` places of one kind, each with its own jittered capacity.
    pub fn sample_jittered(
        &mut self,
        kind:        PlaceKind,
        count:       usize,
        nominal:     u32,
        probability: Option<f64>,
    ) -> PlaceResult<Vec<Place>> {
        (0..count)
            .map(|_| {
                let capacity = self.jittered_capacity(nominal)?;
                self.sample(kind, capacity, probability)
            })
            .collect()
    }
}
