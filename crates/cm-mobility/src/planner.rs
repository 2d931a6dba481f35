//! Trip-planning trait and default preference-aware Dijkstra.
//!
//! # Pluggability
//!
//! Agent processes call planning via the [`TripPlanner`] trait, so
//! applications can swap in A*, a lazily-materialising planner, or a
//! behavioural model without touching the graph.
//!
//! # Cost model
//!
//! Edge costs are computed per query from the caller's [`ModePreference`]
//! (see [`select_mode`]).  Costs are dimensionless `f64`s; the heap orders
//! them through `OrderedFloat`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use cm_core::{ModeId, PlaceId, TransitId};

use crate::{CityGraph, EdgeBundle, MobilityError, MobilityResult, ModePreference, Transit};

// ── TripPlan ──────────────────────────────────────────────────────────────────

/// One leg of a [`TripPlan`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanHop {
    pub transit: TransitId,
    /// The mode that won cost selection on this leg.
    pub mode:    ModeId,
    /// Effective cost of this leg under the query's preference.
    pub cost:    f64,
}

/// The result of a planning query: the transits to take, in order.
///
/// Consecutive hops are contiguous: the destination of hop *i* is the
/// source of hop *i + 1*.  An empty plan means either an identity trip or an
/// unreachable destination; callers that must tell them apart compare the
/// endpoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripPlan {
    pub hops:       Vec<PlanHop>,
    /// Sum of hop costs.
    pub total_cost: f64,
}

impl TripPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Transit ids in travel order.
    pub fn transit_ids(&self) -> impl Iterator<Item = TransitId> + '_ {
        self.hops.iter().map(|h| h.transit)
    }

    /// Selected mode of every hop, in travel order.
    pub fn modes(&self) -> impl Iterator<Item = ModeId> + '_ {
        self.hops.iter().map(|h| h.mode)
    }

    /// Resolve every hop against the graph the plan was made on.
    ///
    /// # Panics
    /// Panics if `graph` is not the graph that produced this plan.
    pub fn transits<'g>(&'g self, graph: &'g CityGraph) -> impl Iterator<Item = &'g Transit> + 'g {
        self.hops.iter().map(move |h| {
            graph
                .transit(h.transit)
                .unwrap_or_else(|| panic!("{} is not a transit of this graph", h.transit))
        })
    }
}

// ── TripPlanner trait ─────────────────────────────────────────────────────────

/// Pluggable trip planner.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: many agents plan concurrently
/// against one shared `&CityGraph`.
pub trait TripPlanner: Send + Sync {
    /// Plan a trip from `from` to `to` using only the modes in `preference`.
    ///
    /// `from == to` and unreachable destinations both yield an empty plan,
    /// as does any query on a graph with no places.  Otherwise ids outside
    /// the graph are an error.
    fn plan(
        &self,
        graph: &CityGraph,
        from: PlaceId,
        to: PlaceId,
        preference: &ModePreference,
    ) -> MobilityResult<TripPlan>;

    /// [`plan`](Self::plan) by place name.
    fn plan_by_name(
        &self,
        graph: &CityGraph,
        from: &str,
        to: &str,
        preference: &ModePreference,
    ) -> MobilityResult<TripPlan> {
        let from = graph.require_place(from)?;
        let to = graph.require_place(to)?;
        self.plan(graph, from, to, preference)
    }
}

// ── Mode selection ────────────────────────────────────────────────────────────

/// Cheapest mode of `bundle` under `preference`, with its cost.
///
/// Modes not in the preference are ignored; `None` means the bundle is
/// unusable for this query.  Links are visited in ascending `ModeId` order
/// and only a strictly lower cost replaces the incumbent, so equal costs go
/// to the mode whose name sorts first.
pub fn select_mode(
    graph: &CityGraph,
    bundle: &EdgeBundle,
    preference: &ModePreference,
) -> Option<(f64, ModeId)> {
    let mut best: Option<(f64, ModeId)> = None;
    for link in &bundle.links {
        let Some(weight) = preference.weight(link.mode) else {
            continue;
        };
        let cost = graph
            .modes()
            .mode(link.mode)
            .favorability_given_distance(bundle.distance_m)
            / weight;
        if !(cost.is_finite() && cost >= 0.0) {
            continue;
        }
        if best.is_none_or(|(c, _)| cost < c) {
            best = Some((cost, link.mode));
        }
    }
    best
}

// ── DijkstraPlanner ───────────────────────────────────────────────────────────

/// Dijkstra over the city graph with per-query edge pricing.
///
/// Heap ties on cost are broken by `PlaceId`, and edge ties by
/// [`select_mode`], so identical inputs always produce identical plans.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraPlanner;

impl TripPlanner for DijkstraPlanner {
    fn plan(
        &self,
        graph: &CityGraph,
        from: PlaceId,
        to: PlaceId,
        preference: &ModePreference,
    ) -> MobilityResult<TripPlan> {
        dijkstra(graph, from, to, preference)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// How a settled place was reached.
#[derive(Copy, Clone)]
struct Predecessor {
    from: PlaceId,
    mode: ModeId,
    cost: f64,
}

fn dijkstra(
    graph: &CityGraph,
    from: PlaceId,
    to: PlaceId,
    preference: &ModePreference,
) -> MobilityResult<TripPlan> {
    // Nothing is reachable in a city without places.
    if graph.is_empty() {
        log::debug!("planning {from} -> {to} on an empty city graph");
        return Ok(TripPlan::empty());
    }
    for id in [from, to] {
        if !graph.contains(id) {
            return Err(MobilityError::PlaceNotFound(id));
        }
    }
    if from == to {
        return Ok(TripPlan::empty());
    }

    let n = graph.place_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = predecessor and selected mode; None for unreached places.
    let mut prev: Vec<Option<Predecessor>> = vec![None; n];

    dist[from.index()] = 0.0;

    // Min-heap: (cost, place).  Secondary key PlaceId keeps ties deterministic.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, PlaceId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), place))) = heap.pop() {
        if place == to {
            return Ok(reconstruct(graph, &prev, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[place.index()] {
            continue;
        }

        for bundle in graph.bundles_from(place) {
            let Some((edge_cost, mode)) = select_mode(graph, bundle, preference) else {
                continue;
            };
            let new_cost = cost + edge_cost;
            let next = bundle.to;

            if new_cost < dist[next.index()] {
                log::trace!("relax {place} -> {next} via {mode}: {new_cost:.3}");
                dist[next.index()] = new_cost;
                prev[next.index()] = Some(Predecessor { from: place, mode, cost: edge_cost });
                heap.push(Reverse((OrderedFloat(new_cost), next)));
            }
        }
    }

    log::debug!("no trip from {from} to {to} under {} preferred modes", preference.len());
    Ok(TripPlan::empty())
}

/// Walk predecessor pointers back from `to` and map each hop to its transit.
///
/// # Panics
/// Panics if a hop has no transit: the planner only relaxes edges that exist.
fn reconstruct(
    graph: &CityGraph,
    prev: &[Option<Predecessor>],
    from: PlaceId,
    to: PlaceId,
    total_cost: f64,
) -> TripPlan {
    let mut hops = Vec::new();
    let mut cur = to;
    while cur != from {
        let Some(p) = prev[cur.index()] else {
            panic!("{cur} settled without a predecessor");
        };
        let transit = graph.transit_id(p.from, cur, p.mode).unwrap_or_else(|| {
            panic!("no transit {} -> {} by {} in city graph", p.from, cur, p.mode)
        });
        hops.push(PlanHop { transit, mode: p.mode, cost: p.cost });
        cur = p.from;
    }
    hops.reverse();
    TripPlan { hops, total_cost }
}
