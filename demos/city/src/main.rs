//! city: end-to-end demo of the citymob mobility engine.
//!
//! Builds a small random city (stores, parks, misc venues) plus a handful of
//! homes and workplaces from an embedded CSV, plans commutes under a few
//! mode preferences, and walks one commuter through a bus ride to show the
//! occupancy and exposure bookkeeping.
//!
//! Run with `RUST_LOG=debug` to see graph construction and unreachable-trip
//! diagnostics.

use std::collections::HashSet;
use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use cm_core::{OccupantId, SimConfig};
use cm_mobility::{CityGraph, CityGraphBuilder, DijkstraPlanner, ModeRegistry, TripPlan, TripPlanner};
use cm_place::{
    Admission, Capacity, CityBounds, DecayingExposure, Occupiable, PlaceKind, PlaceSampler,
    load_places_reader,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:             u64 = 0;
const MINUTES_PER_TICK: u32 = 15;
const SIM_DAYS:         u32 = 10;
const N_STORES:         usize = 20;
const N_PARKS:          usize = 5;
const N_MISC:           usize = 20;
const VENUE_CAPACITY:   u32 = 30;

// ── Homes and workplaces ──────────────────────────────────────────────────────

// Empty capacity = unbounded.
const ANCHORS_CSV: &str = "\
name,kind,capacity,lat,lon,probability\n\
plateau_home,household,,45.5230,-73.5800,1.0\n\
verdun_home,household,,45.4590,-73.5700,1.0\n\
westmount_home,household,,45.4850,-73.6000,1.0\n\
downtown_office,workplace,200,45.5010,-73.5670,0.3\n\
mile_end_studio,workplace,40,45.5250,-73.5990,0.3\n\
";

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_city(config: &SimConfig) -> Result<CityGraph> {
    let bounds = CityBounds::new(45.455, 45.530, -73.620, -73.550)?;
    let mut root = config.make_rng();
    let mut sampler = PlaceSampler::new(root.split(), bounds);

    let mut builder = CityGraphBuilder::with_capacity(ModeRegistry::standard(), 64);
    builder.add_places(load_places_reader(Cursor::new(ANCHORS_CSV)).context("anchor places")?);
    builder.add_places(sampler.sample_jittered(PlaceKind::Store, N_STORES, VENUE_CAPACITY, Some(0.6))?);
    builder.add_places(sampler.sample_many(PlaceKind::Park, N_PARKS, Capacity::Unbounded, Some(0.05))?);
    builder.add_places(sampler.sample_jittered(PlaceKind::Misc, N_MISC, VENUE_CAPACITY, None)?);

    log::info!("building city graph from {} places", builder.place_count());
    Ok(builder.build()?)
}

fn describe(graph: &CityGraph, plan: &TripPlan) -> String {
    if plan.is_empty() {
        return "(no trip)".to_string();
    }
    let legs: Vec<&str> = plan.transits(graph).map(|t| t.name()).collect();
    format!("{}  [cost {:.1}]", legs.join("  ·  "), plan.total_cost)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let start = NaiveDate::from_ymd_opt(2020, 2, 28)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;
    let config = SimConfig {
        start,
        minutes_per_tick: MINUTES_PER_TICK,
        simulation_days:  SIM_DAYS,
        seed:             SEED,
    };
    let mut clock = config.make_clock()?;

    println!("=== city — citymob mobility demo ===");
    println!("Seed: {SEED}  |  {MINUTES_PER_TICK} min/tick  |  run ends at {}", config.end_tick());
    println!();

    // 1. City graph.
    let t0 = Instant::now();
    let mut city = build_city(&config)?;
    log::info!("city graph ready in {:?}", t0.elapsed());
    println!(
        "City: {} places, {} transits over {:?} ({:.1} ms)",
        city.place_count(),
        city.transit_count(),
        city.modes(),
        t0.elapsed().as_secs_f64() * 1e3,
    );
    println!();

    // 2. Commutes under different preferences.
    let modes = city.modes();
    let preferences = [
        ("walker", modes.preference([("walking", 1.0)])?),
        ("cyclist", modes.preference([("bicycle", 2.0), ("walking", 1.0)])?),
        ("transit rider", modes.preference([("walking", 1.0), ("bus", 1.5)])?),
        ("driver", modes.preference([("walking", 0.5), ("car", 2.0)])?),
    ];
    let commutes = [
        ("plateau_home", "downtown_office"),
        ("verdun_home", "mile_end_studio"),
        ("westmount_home", "store3"),
    ];

    for (from, to) in commutes {
        println!("{from} → {to}");
        for (who, pref) in &preferences {
            let plan = DijkstraPlanner.plan_by_name(&city, from, to, pref)?;
            log::info!("planned {from} -> {to} for {who}: {} hops", plan.len());
            println!("  {who:<14} {}", describe(&city, &plan));
        }
        println!();
    }

    // 3. Ride the first bus leg of a commute.
    clock.advance_by(clock.ticks_for_hours(8));
    let rider = OccupantId(1);
    let sick: HashSet<OccupantId> = [OccupantId(2)].into_iter().collect();
    let bus_pref = &preferences[2].1;
    let plan = DijkstraPlanner.plan_by_name(&city, "verdun_home", "mile_end_studio", bus_pref)?;
    let bus = city.modes().id_of("bus").context("standard registry has a bus")?;

    if let Some(hop) = plan.hops.iter().find(|h| h.mode == bus) {
        let transit = city.transit_mut(hop.transit).context("planned transit exists")?;
        for who in [OccupantId(2), rider] {
            match transit.occupancy_mut().request(who)? {
                Admission::Granted => {}
                Admission::Queued { position } => println!("  {who} queued at {position}"),
            }
        }
        println!("{clock}: {}", transit.summary(&sick));
        println!("  interaction probability: {:.2}", transit.interaction_probability(&sick));

        transit.occupancy_mut().release(OccupantId(2), clock.now(), &sick)?;
        clock.advance_by(clock.ticks_for_minutes(30));
        let decay = DecayingExposure::new(4.0);
        println!(
            "{clock}: after the sick rider left, decayed exposure {:.3}",
            transit.exposure_probability(clock.now(), &sick, &decay),
        );
        transit.occupancy_mut().release(rider, clock.now(), &sick)?;
    } else {
        log::warn!("no bus leg between verdun_home and mile_end_studio");
        println!("No bus leg on the transit rider's commute.");
    }

    println!();
    println!(
        "Clock: {}  hour {}  {}  weekend: {}",
        clock.time_of_day(),
        clock.hour_of_day(),
        clock.day_of_week(),
        clock.is_weekend(),
    );
    Ok(())
}
