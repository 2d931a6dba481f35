//! `cm-mobility`: mobility modes, the city graph, and trip planning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`mode`]    | `MobilityMode` trait, `ModeSpec`, `ModeRegistry`, `ModePreference` |
//! | [`transit`] | `Transit`, a directed, mode-specific, occupiable journey      |
//! | [`graph`]   | `CityGraph` (CSR of edge bundles + R-tree), `CityGraphBuilder` |
//! | [`planner`] | `TripPlanner` trait, `TripPlan`, `PlanHop`, `DijkstraPlanner`  |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                           |
//!
//! # Edge model
//!
//! Between every pair of places the graph stores one **edge bundle** per
//! direction: the raw distance plus one `(mode, transit)` link for every mode
//! whose compatibility predicate accepts that distance.  Costs are *not*
//! stored.  The planner prices each bundle per query from the caller's
//! [`ModePreference`]:
//!
//! ```text
//! cost(bundle) = min over shared modes m of  favorability_m(distance) / weight_m
//! ```
//!
//! and remembers which mode won, so every hop of the returned [`TripPlan`]
//! maps to a concrete [`Transit`].
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Parallel pair enumeration in `CityGraphBuilder::build`.   |
//! | `fx-hash`  | FxHash for the graph's lookup indices.                    |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `ModeSpec`.          |

pub mod error;
pub mod graph;
pub mod mode;
pub mod planner;
pub mod transit;


pub use error::{MobilityError, MobilityResult};
pub use graph::{CityGraph, CityGraphBuilder, EdgeBundle, ModeLink};
pub use mode::{MobilityMode, ModePreference, ModeRegistry, ModeSpec};
pub use planner::{DijkstraPlanner, PlanHop, TripPlan, TripPlanner, select_mode};
pub use transit::Transit;
