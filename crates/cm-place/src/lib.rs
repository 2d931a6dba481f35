//! `cm-place`: occupiable places and their capacity model.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`capacity`]   | `Capacity` (limited or unbounded)                         |
//! | [`occupant`]   | `InfectionStatus` capability, `Occupiable` trait          |
//! | [`occupancy`]  | `Occupancy`, a capacity-limited FIFO admission queue      |
//! | [`exposure`]   | `ExposureModel` trait, `FlatExposure`, `DecayingExposure` |
//! | [`place`]      | `PlaceKind`, `Place`                                      |
//! | [`loader`]     | `load_places_csv`, `load_places_reader`                   |
//! | [`sampler`]    | `CityBounds`, `PlaceSampler` (seeded random places)       |
//! | [`error`]      | `PlaceError`, `PlaceResult<T>`                            |
//!
//! # Occupancy contract
//!
//! Places (and the transits built in `cm-mobility`) do not decide *when* an
//! agent enters or leaves; the external scheduler does.  What they own is
//! the bookkeeping:
//!
//! ```text
//! request(agent)  → Granted            (slot free)
//!                 → Queued { position } (full; FIFO)
//! release(agent)  → Some(next)         (head of queue promoted to holder)
//! abandon(agent)  → drop from the queue, or release a held slot
//! ```
//!
//! Every granted slot must be released (or abandoned) exactly once, on every
//! exit path of the agent process.

pub mod capacity;
pub mod error;
pub mod exposure;
pub mod loader;
pub mod occupancy;
pub mod occupant;
pub mod place;
pub mod sampler;

#[cfg(test)]
mod tests;

pub use capacity::Capacity;
pub use error::{PlaceError, PlaceResult};
pub use exposure::{DecayingExposure, ExposureModel, FlatExposure};
pub use loader::{load_places_csv, load_places_reader};
pub use occupancy::{Admission, Occupancy};
pub use occupant::{InfectionStatus, Occupiable};
pub use place::{Place, PlaceKind, validate_probability};
pub use sampler::{CityBounds, PlaceSampler};
