//! The orchestrator: the single owner of stops, buses and routing settings.
//!
//! Ingest runs in two ordered phases — all `Stop` requests, then all `Bus`
//! requests — because a bus's [`transport::initialize_route`] resolves stop
//! names created in phase one. [`TransportDatabase::build`] then compiles
//! the split-vertex graph described in the spec and hands it to
//! [`Router`]; after that call the database only answers queries.

use std::collections::{HashMap, HashSet};

use crate::error::IngestError;
use crate::graph::{DirectedWeightedGraph, VertexId};
use crate::point::Point;
use crate::router::{Router, RouterError};
use crate::transport::{self, Bus, BusId, BusRoute, BusRouteInfo, RouteKind, RouteSettings, Stop, StopId};

/// One reconstructed routing step, in travel order.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteAction {
    Wait { stop_name: String, time: f64 },
    Bus { bus_number: String, span_count: usize, time: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub total_time: f64,
    pub actions: Vec<RouteAction>,
}

/// What a graph vertex represents, used only to reconstruct human-readable
/// actions from an edge sequence — the router itself is agnostic to it.
#[derive(Debug, Clone, Copy)]
enum VertexKind {
    Abstract(StopId),
    BusInstance(BusId),
}

struct PendingDistance {
    from: StopId,
    to_name: String,
    metres: u32,
}

pub struct TransportDatabase {
    stops: Vec<Stop>,
    stop_index: HashMap<String, StopId>,
    pending_distances: Vec<PendingDistance>,
    distances: HashMap<(StopId, StopId), u32>,
    buses: Vec<Bus>,
    bus_index: HashMap<String, BusId>,
    bus_stop_ids: Vec<Vec<StopId>>,
    settings: RouteSettings,
    router: Option<Router>,
    vertex_kind: Vec<VertexKind>,
}

impl Default for TransportDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportDatabase {
    pub fn new() -> Self {
        Self {
            stops: Vec::new(),
            stop_index: HashMap::new(),
            pending_distances: Vec::new(),
            distances: HashMap::new(),
            buses: Vec::new(),
            bus_index: HashMap::new(),
            bus_stop_ids: Vec::new(),
            settings: RouteSettings::new(0, 0.0),
            router: None,
            vertex_kind: Vec::new(),
        }
    }

    /// Phase 1. Road distances are recorded by name and resolved once every
    /// stop has been seen (see [`Self::finalize_stops`]), since a stop's
    /// `road_distances` map may name a stop that hasn't been declared yet.
    pub fn add_stop(
        &mut self,
        name: String,
        latitude: f64,
        longitude: f64,
        road_distances: HashMap<String, u32>,
    ) -> Result<(), IngestError> {
        if self.stop_index.contains_key(&name) {
            return Err(IngestError::DuplicateStop(name));
        }
        let id = self.stops.len() as StopId;
        self.stop_index.insert(name.clone(), id);
        for (to_name, metres) in road_distances {
            self.pending_distances.push(PendingDistance { from: id, to_name, metres });
        }
        self.stops.push(Stop::new(name, Point::new(latitude, longitude)));
        Ok(())
    }

    /// Resolves every road distance recorded during phase 1 into the shared
    /// `(from, to) -> metres` table. Must run after all `Stop` requests and
    /// before any `Bus` request, since [`transport::initialize_route`]
    /// relies on this table already being populated for the stops it knows.
    pub fn finalize_stops(&mut self) -> Result<(), IngestError> {
        for pending in self.pending_distances.drain(..) {
            let to_id = *self.stop_index.get(&pending.to_name).ok_or_else(|| IngestError::UnknownStopInRoadDistances {
                from: self.stops[pending.from as usize].name.clone(),
                to: pending.to_name.clone(),
            })?;
            self.distances.insert((pending.from, to_id), pending.metres);
        }
        Ok(())
    }

    /// Phase 2. Resolves stop names, runs [`transport::initialize_route`]
    /// (which backfills reciprocal distances into the shared table), and
    /// registers this bus against every stop it serves.
    pub fn add_bus(&mut self, number: String, stop_names: Vec<String>, is_roundtrip: bool) -> Result<(), IngestError> {
        if self.bus_index.contains_key(&number) {
            return Err(IngestError::DuplicateBus(number));
        }
        let kind = if is_roundtrip { RouteKind::Circular } else { RouteKind::Direct };

        let mut stop_ids = Vec::with_capacity(stop_names.len());
        for stop_name in &stop_names {
            let id = *self
                .stop_index
                .get(stop_name)
                .ok_or_else(|| IngestError::UnknownStopReference { bus: number.clone(), stop: stop_name.clone() })?;
            stop_ids.push(id);
        }

        let info = transport::initialize_route(kind, &stop_ids, &self.stops, &mut self.distances)?;

        let bus_id = self.buses.len() as BusId;
        for &stop_id in stop_ids.iter().collect::<HashSet<_>>() {
            let buses = &mut self.stops[stop_id as usize].buses;
            if !buses.contains(&bus_id) {
                buses.push(bus_id);
            }
        }

        self.bus_index.insert(number.clone(), bus_id);
        self.buses.push(Bus { number, route: BusRoute::new(kind, stop_names), info });
        self.bus_stop_ids.push(stop_ids);
        Ok(())
    }

    pub fn set_route_settings(&mut self, bus_wait_time_min: u32, bus_velocity_km_h: f64) {
        self.settings = RouteSettings::new(bus_wait_time_min, bus_velocity_km_h);
    }

    /// `InitializeRouter`: compiles the two-layer split-vertex graph and
    /// precomputes shortest paths from every abstract (stop) vertex.
    ///
    /// Vertex numbering is deterministic: abstract vertices first, in stop
    /// insertion order (so `stop_id == abstract vertex id`), then for each
    /// bus in insertion order its bus-instance vertices — the forward run
    /// followed by the reverse run for a `Direct` bus, a single run for a
    /// `Circular` one.
    pub fn build(&mut self) {
        let num_abstract = self.stops.len();
        let mut num_bus_instances = 0usize;
        for (bus_idx, bus) in self.buses.iter().enumerate() {
            let run_len = self.bus_stop_ids[bus_idx].len();
            num_bus_instances += match bus.route.kind {
                RouteKind::Circular => run_len,
                RouteKind::Direct => 2 * run_len,
            };
        }
        let total_vertices = num_abstract + num_bus_instances;

        let mut graph = DirectedWeightedGraph::new(total_vertices);
        let mut vertex_kind = Vec::with_capacity(total_vertices);
        for stop_id in 0..num_abstract {
            vertex_kind.push(VertexKind::Abstract(stop_id as StopId));
        }

        let half_wait = self.settings.bus_wait_time_min as f64 / 2.0;
        let velocity = self.settings.bus_velocity_m_per_min;

        for (bus_idx, bus) in self.buses.iter().enumerate() {
            let bus_id = bus_idx as BusId;
            let stop_ids = &self.bus_stop_ids[bus_idx];

            let runs: Vec<Vec<StopId>> = match bus.route.kind {
                RouteKind::Circular => vec![stop_ids.clone()],
                RouteKind::Direct => vec![stop_ids.clone(), stop_ids.iter().rev().copied().collect()],
            };

            for run in runs {
                let mut run_vertices = Vec::with_capacity(run.len());
                for &stop_id in &run {
                    let vertex = vertex_kind.len() as VertexId;
                    vertex_kind.push(VertexKind::BusInstance(bus_id));
                    run_vertices.push(vertex);

                    let abstract_vertex = stop_id as VertexId;
                    graph.add_edge(abstract_vertex, vertex, half_wait);
                    graph.add_edge(vertex, abstract_vertex, half_wait);
                }

                for i in 1..run.len() {
                    let metres = self.distances[&(run[i - 1], run[i])] as f64;
                    graph.add_edge(run_vertices[i - 1], run_vertices[i], metres / velocity);
                }
            }
        }

        let sources: Vec<VertexId> = (0..num_abstract as VertexId).collect();
        self.router = Some(Router::new(graph, &sources));
        self.vertex_kind = vertex_kind;
    }

    pub fn get_bus(&self, name: &str) -> Option<&BusRouteInfo> {
        let &id = self.bus_index.get(name)?;
        Some(&self.buses[id as usize].info)
    }

    /// Lexicographically sorted, deduplicated bus numbers serving `name`.
    pub fn get_stop(&self, name: &str) -> Option<Vec<String>> {
        let &id = self.stop_index.get(name)?;
        let mut numbers: Vec<String> = self.stops[id as usize].buses.iter().map(|&bus_id| self.buses[bus_id as usize].number.clone()).collect();
        numbers.sort();
        Some(numbers)
    }

    /// `None` if either stop name is unknown. `Ok(None)` if the router finds
    /// no path. Same source and target yields a zero-edge, zero-time route.
    pub fn get_route(&mut self, from: &str, to: &str) -> Result<Option<RouteResponse>, RouterError> {
        let (Some(&from_id), Some(&to_id)) = (self.stop_index.get(from), self.stop_index.get(to)) else {
            return Ok(None);
        };
        let from_vertex = from_id as VertexId;
        let to_vertex = to_id as VertexId;

        let edges = {
            let router = self.router.as_mut().expect("build() must run before get_route()");
            let Some(info) = router.build_route(from_vertex, to_vertex)? else {
                return Ok(None);
            };
            let mut edges = Vec::with_capacity(info.edge_count);
            for i in 0..info.edge_count {
                edges.push(router.route_edge(info.route_id, i)?);
            }
            router.release_route(info.route_id);
            edges
        };

        let router = self.router.as_ref().expect("build() must run before get_route()");
        Ok(Some(self.translate_route(&edges, router)))
    }

    /// Walks a reconstructed edge sequence and accumulates Wait/Bus actions.
    ///
    /// A boarding (abstract -> bus-instance) closes with a Wait action
    /// priced at the *full* wait (the edge's half-wait, doubled) and opens a
    /// new Bus action. A continuation (bus-instance -> bus-instance)
    /// extends the open Bus action. An alighting (-> abstract) closes it.
    /// The doubled boarding weight and the un-counted alighting weight are
    /// two applications of the same half-wait, so summing item times still
    /// matches `total_time` in aggregate even though no single edge's
    /// weight equals a single item's time.
    fn translate_route(&self, edges: &[crate::graph::EdgeId], router: &Router) -> RouteResponse {
        let mut total_time = 0.0;
        let mut actions = Vec::new();

        struct OpenBus {
            bus_id: BusId,
            span_count: usize,
            time: f64,
        }
        let mut open_bus: Option<OpenBus> = None;

        for &edge_id in edges {
            let edge = router.edge(edge_id);
            total_time += edge.weight;

            match self.vertex_kind[edge.to as usize] {
                VertexKind::BusInstance(bus_id) => match self.vertex_kind[edge.from as usize] {
                    VertexKind::Abstract(stop_id) => {
                        actions.push(RouteAction::Wait { stop_name: self.stops[stop_id as usize].name.clone(), time: edge.weight * 2.0 });
                        open_bus = Some(OpenBus { bus_id, span_count: 0, time: 0.0 });
                    }
                    VertexKind::BusInstance(_) => {
                        let bus = open_bus.as_mut().expect("ride edge without an open boarding");
                        bus.span_count += 1;
                        bus.time += edge.weight;
                    }
                },
                VertexKind::Abstract(_) => {
                    let bus = open_bus.take().expect("alighting edge without an open boarding");
                    actions.push(RouteAction::Bus {
                        bus_number: self.buses[bus.bus_id as usize].number.clone(),
                        span_count: bus.span_count,
                        time: bus.time,
                    });
                }
            }
        }

        RouteResponse { total_time, actions }
    }
}
