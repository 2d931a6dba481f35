//! `cm-core`: foundational types for the `citymob` mobility engine.
//!
//! Every other `cm-*` crate depends on this one.  It has no `cm-*`
//! dependencies and a short external list (`chrono`, `rand`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PlaceId`, `TransitId`, `ModeId`, `OccupantId`        |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `SimRng` (seeded, reproducible)                       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{ModeId, OccupantId, PlaceId, TransitId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
