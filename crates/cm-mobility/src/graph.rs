//! The multi-modal city graph and its builder.
//!
//! # Data layout
//!
//! Nodes are places.  For every ordered pair of places with at least one
//! compatible mode there is one [`EdgeBundle`]; bundles are stored in
//! **Compressed Sparse Row (CSR)** form sorted by `(from, to)`:
//!
//! ```text
//! bundles[ bundle_start[p] .. bundle_start[p+1] ]   // outgoing bundles of p
//! ```
//!
//! Each bundle lists its `(mode, transit)` links in ascending `ModeId`
//! order.  Transits live in a flat `Vec` indexed by `TransitId`, with a
//! `(from, to, mode) → TransitId` index for path reconstruction.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `PlaceId`, for
//! callers that need to resample a destination near a given point.
//!
//! # Cost of construction
//!
//! Every unordered pair is tested against every mode: O(P² × M) distance
//! and predicate evaluations, and one `Transit` per compatible
//! (ordered pair, mode).  Fine for a few thousand places; larger cities
//! should switch to materialising transits on first use.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use cm_core::{GeoPoint, ModeId, PlaceId, TransitId};
use cm_place::{Occupiable, Place};

use crate::{MobilityError, MobilityResult, ModeRegistry, Transit};

#[cfg(feature = "fx-hash")]
type IndexMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type IndexMap<K, V> = std::collections::HashMap<K, V>;

// ── R-tree place entry ────────────────────────────────────────────────────────

#[derive(Clone)]
struct PlaceEntry {
    point: [f64; 2], // [lat, lon]
    id: PlaceId,
}

impl RTreeObject for PlaceEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PlaceEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough for
    /// nearest-place queries within one city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Edge bundle ───────────────────────────────────────────────────────────────

/// One usable mode on a bundle and the transit realising it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModeLink {
    pub mode:    ModeId,
    pub transit: TransitId,
}

/// All ways of going directly from `from` to `to`.
#[derive(Clone, Debug)]
pub struct EdgeBundle {
    pub from:       PlaceId,
    pub to:         PlaceId,
    /// Great-circle distance, metres.
    pub distance_m: f64,
    /// Sorted by ascending `ModeId`; never empty.
    pub links:      Vec<ModeLink>,
}

impl EdgeBundle {
    pub fn link(&self, mode: ModeId) -> Option<ModeLink> {
        self.links
            .binary_search_by_key(&mode, |l| l.mode)
            .ok()
            .map(|i| self.links[i])
    }
}

// ── CityGraph ─────────────────────────────────────────────────────────────────

/// Places, transits, and the compatibility-filtered edges between them.
///
/// Topology is fixed after [`CityGraphBuilder::build`].  Occupancy of places
/// and transits stays mutable through [`place_mut`](Self::place_mut) and
/// [`transit_mut`](Self::transit_mut); planning only needs `&CityGraph`.
pub struct CityGraph {
    places:        Vec<Place>,
    name_index:    IndexMap<String, PlaceId>,
    modes:         ModeRegistry,
    /// CSR row pointer, length `place_count + 1`.
    bundle_start:  Vec<u32>,
    bundles:       Vec<EdgeBundle>,
    transits:      Vec<Transit>,
    transit_index: IndexMap<(PlaceId, PlaceId, ModeId), TransitId>,
    spatial_idx:   RTree<PlaceEntry>,
}

impl CityGraph {
    /// A graph with no places.  Every plan against it is unreachable.
    pub fn empty(modes: ModeRegistry) -> Self {
        CityGraphBuilder::new(modes).build_unchecked()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Number of directed (pair, mode) edges, i.e. transits.
    pub fn transit_count(&self) -> usize {
        self.transits.len()
    }

    /// Number of directed place pairs with at least one mode.
    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: PlaceId) -> bool {
        id.index() < self.places.len()
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    // ── Places ────────────────────────────────────────────────────────────

    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.places.get(id.index())
    }

    pub fn place_mut(&mut self, id: PlaceId) -> Option<&mut Place> {
        self.places.get_mut(id.index())
    }

    pub fn place_id(&self, name: &str) -> Option<PlaceId> {
        self.name_index.get(name).copied()
    }

    /// Like [`place_id`](Self::place_id) but as a `Result`.
    pub fn require_place(&self, name: &str) -> MobilityResult<PlaceId> {
        self.place_id(name)
            .ok_or_else(|| MobilityError::UnknownPlace(name.to_string()))
    }

    pub fn places(&self) -> impl Iterator<Item = (PlaceId, &Place)> + '_ {
        self.places
            .iter()
            .enumerate()
            .map(|(i, p)| (PlaceId(i as u32), p))
    }

    // ── Transits ──────────────────────────────────────────────────────────

    pub fn transit(&self, id: TransitId) -> Option<&Transit> {
        self.transits.get(id.index())
    }

    pub fn transit_mut(&mut self, id: TransitId) -> Option<&mut Transit> {
        self.transits.get_mut(id.index())
    }

    pub fn transits(&self) -> impl Iterator<Item = &Transit> + '_ {
        self.transits.iter()
    }

    /// The transit for `from → to` by `mode`, if that edge exists.
    #[inline]
    pub fn transit_id(&self, from: PlaceId, to: PlaceId, mode: ModeId) -> Option<TransitId> {
        self.transit_index.get(&(from, to, mode)).copied()
    }

    pub fn transit_between(&self, from: PlaceId, to: PlaceId, mode: ModeId) -> Option<&Transit> {
        self.transit_id(from, to, mode).and_then(|id| self.transit(id))
    }

    #[inline]
    pub fn has_edge(&self, from: PlaceId, to: PlaceId, mode: ModeId) -> bool {
        self.transit_index.contains_key(&(from, to, mode))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing bundles of `place`, sorted by destination.  Empty for
    /// unknown ids.
    #[inline]
    pub fn bundles_from(&self, place: PlaceId) -> &[EdgeBundle] {
        if !self.contains(place) {
            return &[];
        }
        let start = self.bundle_start[place.index()] as usize;
        let end   = self.bundle_start[place.index() + 1] as usize;
        &self.bundles[start..end]
    }

    /// The bundle `from → to`, if any mode connects them directly.
    pub fn bundle(&self, from: PlaceId, to: PlaceId) -> Option<&EdgeBundle> {
        let out = self.bundles_from(from);
        out.binary_search_by_key(&to, |b| b.to).ok().map(|i| &out[i])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The place nearest to `pos`, `None` only for an empty graph.
    pub fn nearest_place(&self, pos: GeoPoint) -> Option<PlaceId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Up to `k` places nearest to `pos`, closest first.
    pub fn k_nearest_places(&self, pos: GeoPoint, k: usize) -> Vec<PlaceId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── CityGraphBuilder ──────────────────────────────────────────────────────────

/// Collects places, then materialises every compatible edge in
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use cm_core::GeoPoint;
/// use cm_mobility::{CityGraphBuilder, ModeRegistry};
/// use cm_place::{Capacity, Place, PlaceKind};
///
/// let mut b = CityGraphBuilder::new(ModeRegistry::standard());
/// let home = b.add_place(Place::new("home", PlaceKind::Household, Capacity::Unbounded,
///                                   GeoPoint::new(45.500, -73.570), 1.0).unwrap());
/// let shop = b.add_place(Place::new("shop", PlaceKind::Store, Capacity::Unbounded,
///                                   GeoPoint::new(45.505, -73.570), 0.6).unwrap());
/// let city = b.build().unwrap();
/// // ~556 m apart: walking, bicycle and bus qualify, car does not.
/// assert_eq!(city.bundle(home, shop).unwrap().links.len(), 3);
/// ```
pub struct CityGraphBuilder {
    modes:  ModeRegistry,
    places: Vec<Place>,
}

/// Compatible modes for one unordered place pair, before transits exist.
struct PairLinks {
    a:          PlaceId,
    b:          PlaceId,
    distance_m: f64,
    modes:      Vec<ModeId>,
}

impl CityGraphBuilder {
    pub fn new(modes: ModeRegistry) -> Self {
        Self { modes, places: Vec::new() }
    }

    /// Pre-allocate for the expected number of places.
    pub fn with_capacity(modes: ModeRegistry, places: usize) -> Self {
        Self { modes, places: Vec::with_capacity(places) }
    }

    /// Add a place and return its `PlaceId` (sequential from 0).
    ///
    /// Duplicate names are reported by [`build`](Self::build).
    pub fn add_place(&mut self, place: Place) -> PlaceId {
        let id = PlaceId(self.places.len() as u32);
        self.places.push(place);
        id
    }

    pub fn add_places(&mut self, places: impl IntoIterator<Item = Place>) {
        self.places.extend(places);
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Validate the inputs and produce a [`CityGraph`].
    ///
    /// Fails without producing any graph if two places share a name, if
    /// there are too many places or transits for the id types, or if there
    /// are at least two places and no modes to connect them.
    pub fn build(self) -> MobilityResult<CityGraph> {
        if self.places.len() > u32::MAX as usize {
            return Err(MobilityError::TooMany { what: "places", count: self.places.len() });
        }
        let mut seen: IndexMap<&str, ()> = IndexMap::default();
        for p in &self.places {
            if seen.insert(p.name(), ()).is_some() {
                return Err(MobilityError::DuplicatePlace(p.name().to_string()));
            }
        }
        if self.places.len() >= 2 && self.modes.is_empty() {
            return Err(MobilityError::EmptyModeRegistry(self.places.len()));
        }

        let pairs = self.compatible_pairs();
        let transit_count: usize = pairs.iter().map(|p| 2 * p.modes.len()).sum();
        if transit_count > u32::MAX as usize {
            return Err(MobilityError::TooMany { what: "transits", count: transit_count });
        }

        Ok(self.assemble(pairs, transit_count))
    }

    /// Build without input validation; only used for the empty graph.
    fn build_unchecked(self) -> CityGraph {
        let pairs = self.compatible_pairs();
        let transit_count = pairs.iter().map(|p| 2 * p.modes.len()).sum();
        self.assemble(pairs, transit_count)
    }

    /// Distance and compatible modes for every unordered pair `a < b`, in
    /// `(a, b)` order.
    fn compatible_pairs(&self) -> Vec<PairLinks> {
        let n = self.places.len();

        #[cfg(not(feature = "parallel"))]
        {
            (0..n).flat_map(|a| self.pairs_from(a)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Indexed collect keeps row order, so ids match the sequential build.
            let rows: Vec<Vec<PairLinks>> = (0..n)
                .into_par_iter()
                .map(|a| self.pairs_from(a).collect())
                .collect();
            rows.into_iter().flatten().collect()
        }
    }

    fn pairs_from(&self, a: usize) -> impl Iterator<Item = PairLinks> + '_ {
        let pos_a = self.places[a].position();
        (a + 1..self.places.len()).filter_map(move |b| {
            let distance_m = pos_a.distance_m(self.places[b].position());
            let modes: Vec<ModeId> = self
                .modes
                .iter()
                .filter(|(_, m)| m.is_compatible_with_distance(distance_m))
                .map(|(id, _)| id)
                .collect();
            (!modes.is_empty()).then(|| PairLinks {
                a: PlaceId(a as u32),
                b: PlaceId(b as u32),
                distance_m,
                modes,
            })
        })
    }

    /// Materialise transits and lay out the CSR arrays.
    fn assemble(self, pairs: Vec<PairLinks>, transit_count: usize) -> CityGraph {
        let place_count = self.places.len();

        let mut transits: Vec<Transit> = Vec::with_capacity(transit_count);
        let mut transit_index = IndexMap::default();
        let mut bundles: Vec<EdgeBundle> = Vec::with_capacity(pairs.len() * 2);

        for pair in &pairs {
            for (from, to) in [(pair.a, pair.b), (pair.b, pair.a)] {
                let links = pair
                    .modes
                    .iter()
                    .map(|&mode| {
                        let id = TransitId(transits.len() as u32);
                        transits.push(Transit::new(
                            id,
                            from,
                            self.places[from.index()].name(),
                            to,
                            self.places[to.index()].name(),
                            mode,
                            self.modes.mode(mode),
                            pair.distance_m,
                        ));
                        transit_index.insert((from, to, mode), id);
                        ModeLink { mode, transit: id }
                    })
                    .collect();
                bundles.push(EdgeBundle { from, to, distance_m: pair.distance_m, links });
            }
        }

        // Sort bundles by (from, to) for CSR and per-row binary search.
        bundles.sort_unstable_by_key(|b| (b.from, b.to));

        let mut bundle_start = vec![0u32; place_count + 1];
        for b in &bundles {
            bundle_start[b.from.index() + 1] += 1;
        }
        for i in 1..=place_count {
            bundle_start[i] += bundle_start[i - 1];
        }
        debug_assert_eq!(bundle_start[place_count] as usize, bundles.len());

        let name_index = self
            .places
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name().to_string(), PlaceId(i as u32)))
            .collect();

        // Bulk-load for O(N log N) construction.
        let entries: Vec<PlaceEntry> = self
            .places
            .iter()
            .enumerate()
            .map(|(i, p)| PlaceEntry {
                point: [p.position().lat, p.position().lon],
                id: PlaceId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        log::info!(
            "built city graph: {} places, {} place pairs, {} transits over {} modes",
            place_count,
            pairs.len(),
            transits.len(),
            self.modes.len(),
        );

        CityGraph {
            places: self.places,
            name_index,
            modes: self.modes,
            bundle_start,
            bundles,
            transits,
            transit_index,
            spatial_idx,
        }
    }
}
