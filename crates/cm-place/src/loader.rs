//! CSV place loader.
//!
//! # CSV format
//!
//! One row per place:
//!
//! ```csv
//! name,kind,capacity,lat,lon,probability
//! store0,store,30,45.5017,-73.5673,0.6
//! park0,park,,45.5100,-73.5540,0.05
//! household0,household,inf,45.4950,-73.5800,1.0
//! ```
//!
//! An empty `capacity` or `inf` means unbounded.  `kind` is one of
//! `household`, `workplace`, `store`, `park`, `misc`.
//!
//! Duplicate names are *not* rejected here; `CityGraphBuilder::build` does
//! that, so places from several files can be merged first.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use cm_core::GeoPoint;

use crate::{Capacity, Place, PlaceError, PlaceKind, PlaceResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PlaceRecord {
    name:        String,
    kind:        String,
    capacity:    Option<f64>,
    lat:         f64,
    lon:         f64,
    probability: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load places from a CSV file, in file order.
pub fn load_places_csv(path: &Path) -> PlaceResult<Vec<Place>> {
    let file = std::fs::File::open(path)?;
    let places = load_places_reader(file)?;
    log::info!("loaded {} places from {}", places.len(), path.display());
    Ok(places)
}

/// Like [`load_places_csv`] but accepts any `Read` source.
pub fn load_places_reader<R: Read>(reader: R) -> PlaceResult<Vec<Place>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut places = Vec::new();

    for (row, result) in csv_reader.deserialize::<PlaceRecord>().enumerate() {
        // Row numbers are 1-based data rows (header excluded).
        let place = result
            .map_err(|e| PlaceError::Parse(e.to_string()))
            .and_then(place_from_record)
            .map_err(|e| PlaceError::Row { row: row + 1, source: Box::new(e) })?;
        places.push(place);
    }

    Ok(places)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn place_from_record(r: PlaceRecord) -> PlaceResult<Place> {
    let kind: PlaceKind = r.kind.parse()?;
    if kind == PlaceKind::Transit {
        return Err(PlaceError::Parse(format!(
            "place {:?}: transits are built by the city graph, not loaded",
            r.name
        )));
    }
    let capacity = match r.capacity {
        None    => Capacity::Unbounded,
        Some(c) => Capacity::from_f64(c)?,
    };
    Place::new(r.name, kind, capacity, GeoPoint::new(r.lat, r.lon), r.probability)
}
