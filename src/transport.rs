//! The network model: stops, bus routes, and their derived statistics.
//!
//! Vertex/edge concepts belong to [`crate::graph`]; this module only knows
//! about names, coordinates, and road distances. [`crate::database`] is the
//! single owner of the stop/bus arenas and resolves names to ids before
//! calling into here.

use std::collections::{HashMap, HashSet};

use crate::error::IngestError;
use crate::point::{self, Point};

pub type StopId = u32;
pub type BusId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Direct,
    Circular,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub location: Point,
    /// Ids of buses serving this stop. Populated by
    /// [`crate::database::TransportDatabase::add_bus`] as each bus is
    /// ingested; empty until then.
    pub buses: Vec<BusId>,
}

impl Stop {
    pub fn new(name: impl Into<String>, location: Point) -> Self {
        Self { name: name.into(), location, buses: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusRoute {
    pub kind: RouteKind,
    pub stop_names: Vec<String>,
}

impl BusRoute {
    pub fn new(kind: RouteKind, stop_names: Vec<String>) -> Self {
        Self { kind, stop_names }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusRouteInfo {
    pub num_stops: usize,
    pub num_unique_stops: usize,
    pub road_length_m: u64,
    pub geodesic_length_m: f64,
    pub curvature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSettings {
    pub bus_wait_time_min: u32,
    pub bus_velocity_m_per_min: f64,
}

impl RouteSettings {
    /// `bus_velocity_km_h` is converted to metres/minute with the exact
    /// factor `50.0 / 3.0` (a rational form of `1000.0 / 60.0`), matching
    /// the reference implementation bit-for-bit.
    pub fn new(bus_wait_time_min: u32, bus_velocity_km_h: f64) -> Self {
        Self {
            bus_wait_time_min,
            bus_velocity_m_per_min: bus_velocity_km_h * 50.0 / 3.0,
        }
    }
}

/// Computes a bus route's derived statistics, backfilling any missing
/// reciprocal road distance along the way.
///
/// `stop_ids` is the route's stop sequence already resolved to ids (callers
/// resolve names to ids so unknown-stop errors are reported before this
/// runs). `stops` is the full stop arena, indexed by [`StopId`]. `distances`
/// is the database's single road-distance table, keyed by `(from, to)`
/// pairs; it is mutated in place by the reciprocal-completion step, so a
/// later bus that reuses the same stop pair observes the backfilled entry.
pub fn initialize_route(
    kind: RouteKind,
    stop_ids: &[StopId],
    stops: &[Stop],
    distances: &mut HashMap<(StopId, StopId), u32>,
) -> Result<BusRouteInfo, IngestError> {
    // Step 1: reciprocal distance completion, before any length computation.
    for pair in stop_ids.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let forward = distances.get(&(a, b)).copied();
        let backward = distances.get(&(b, a)).copied();
        match (forward, backward) {
            (None, None) => {
                return Err(IngestError::MissingDistance {
                    from: stops[a as usize].name.clone(),
                    to: stops[b as usize].name.clone(),
                });
            }
            (Some(d), None) => {
                distances.insert((b, a), d);
            }
            (None, Some(d)) => {
                distances.insert((a, b), d);
            }
            (Some(_), Some(_)) => {}
        }
    }

    // Step 2: geodesic length.
    let mut geodesic_length_m: f64 = stop_ids
        .windows(2)
        .map(|pair| point::distance(stops[pair[0] as usize].location, stops[pair[1] as usize].location))
        .sum();

    // Step 3: road length (forward pass, shared by both kinds).
    let mut road_length_m: u64 = stop_ids.windows(2).map(|pair| distances[&(pair[0], pair[1])] as u64).sum();

    // Step 4: counts.
    let num_unique_stops = stop_ids.iter().copied().collect::<HashSet<_>>().len();

    let num_stops = match kind {
        RouteKind::Circular => stop_ids.len(),
        RouteKind::Direct => {
            // Reverse pass: endpoints traversed once, interior stops twice.
            road_length_m += stop_ids.windows(2).map(|pair| distances[&(pair[1], pair[0])] as u64).sum::<u64>();
            geodesic_length_m *= 2.0;
            2 * stop_ids.len() - 1
        }
    };

    let curvature = road_length_m as f64 / geodesic_length_m;

    Ok(BusRouteInfo { num_stops, num_unique_stops, road_length_m, geodesic_length_m, curvature })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    pub number: String,
    pub route: BusRoute,
    pub info: BusRouteInfo,
}
