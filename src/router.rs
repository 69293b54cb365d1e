//! Single-source-shortest-path precomputation and route reconstruction.
//!
//! [`Router::new`] runs Dijkstra once per source vertex and keeps only the
//! per-vertex `(weight, last edge)` pair needed to reconstruct a shortest
//! path — not the full path. [`Router::build_route`] walks that predecessor
//! chain backwards on demand and caches the expanded edge list under a
//! fresh [`RouteId`] until [`Router::release_route`] drops it.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use thiserror::Error;

use crate::graph::{DirectedWeightedGraph, EdgeId, VertexId};

pub type RouteId = u64;

#[derive(Debug, Clone, Copy)]
pub struct RouteInfo {
    pub route_id: RouteId,
    pub weight: f64,
    pub edge_count: usize,
}

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("vertex {0} is not a precomputed source")]
    UnsupportedSource(VertexId),
    #[error("unknown or released route id {0}")]
    BadRouteHandle(RouteId),
    #[error("route {route_id} has only {edge_count} edges, index {index} out of range")]
    EdgeIndexOutOfRange { route_id: RouteId, edge_count: usize, index: usize },
}

#[derive(Debug, Clone, Copy)]
struct Settled {
    weight: f64,
    prev_edge: Option<EdgeId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    weight: f64,
    vertex: VertexId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ascending by (weight, vertex id); callers wrap this in `Reverse`
        // to get a min-heap out of `BinaryHeap`.
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Owns the frozen graph it was built from, so that a single struct can hold
/// both without a self-referential lifetime: the graph never changes after
/// [`Router::new`], and [`crate::database::TransportDatabase`] reaches edges
/// through [`Router::edge`] rather than holding its own reference.
pub struct Router {
    graph: DirectedWeightedGraph,
    per_source: HashMap<VertexId, Vec<Option<Settled>>>,
    next_route_id: RouteId,
    expanded_routes: HashMap<RouteId, Vec<EdgeId>>,
}

impl Router {
    /// Precomputes single-source shortest paths from every vertex in
    /// `sources`. Vertices outside `sources` have no entries; querying from
    /// one is `unsupported-source`.
    pub fn new(graph: DirectedWeightedGraph, sources: &[VertexId]) -> Self {
        let mut per_source = HashMap::with_capacity(sources.len());
        for &source in sources {
            per_source.insert(source, dijkstra(&graph, source));
        }
        Self { graph, per_source, next_route_id: 0, expanded_routes: HashMap::new() }
    }

    pub fn graph(&self) -> &DirectedWeightedGraph {
        &self.graph
    }

    pub fn edge(&self, id: EdgeId) -> &crate::graph::Edge {
        self.graph.edge(id)
    }

    /// Shortest route from `from` to `to`, or `None` if `to` is unreachable.
    ///
    /// `from` must be one of the sources passed to [`Router::new`].
    pub fn build_route(&mut self, from: VertexId, to: VertexId) -> Result<Option<RouteInfo>, RouterError> {
        let table = self.per_source.get(&from).ok_or(RouterError::UnsupportedSource(from))?;
        let Some(settled) = table.get(to as usize).copied().flatten() else {
            return Ok(None);
        };

        let mut edges = Vec::new();
        let mut edge_id = settled.prev_edge;
        while let Some(id) = edge_id {
            edges.push(id);
            let prev_vertex = self.graph.edge(id).from;
            edge_id = table[prev_vertex as usize].and_then(|s| s.prev_edge);
        }
        edges.reverse();

        let route_id = self.next_route_id;
        self.next_route_id += 1;
        let edge_count = edges.len();
        self.expanded_routes.insert(route_id, edges);
        Ok(Some(RouteInfo { route_id, weight: settled.weight, edge_count }))
    }

    pub fn route_edge(&self, route_id: RouteId, index: usize) -> Result<EdgeId, RouterError> {
        let edges = self.expanded_routes.get(&route_id).ok_or(RouterError::BadRouteHandle(route_id))?;
        edges.get(index).copied().ok_or(RouterError::EdgeIndexOutOfRange {
            route_id,
            edge_count: edges.len(),
            index,
        })
    }

    pub fn release_route(&mut self, route_id: RouteId) {
        self.expanded_routes.remove(&route_id);
    }
}

/// Dijkstra from `source`, returning `settled[v] = Some((weight, last edge))`
/// for every vertex `v` reachable from `source`, `None` for unreachable
/// vertices. Ties in the priority queue break on ascending vertex id, and a
/// candidate only replaces a settled distance when it is strictly smaller.
fn dijkstra(graph: &DirectedWeightedGraph, source: VertexId) -> Vec<Option<Settled>> {
    let n = graph.vertex_count();
    let mut settled: Vec<Option<Settled>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut heap = BinaryHeap::new();

    settled[source as usize] = Some(Settled { weight: 0.0, prev_edge: None });
    heap.push(std::cmp::Reverse(HeapEntry { weight: 0.0, vertex: source }));

    while let Some(std::cmp::Reverse(HeapEntry { weight, vertex })) = heap.pop() {
        if visited[vertex as usize] {
            continue;
        }
        visited[vertex as usize] = true;

        for &edge_id in graph.incident_edges(vertex) {
            let edge = graph.edge(edge_id);
            let candidate = weight + edge.weight;
            let improves = match settled[edge.to as usize] {
                Some(existing) => candidate < existing.weight,
                None => true,
            };
            if improves {
                settled[edge.to as usize] = Some(Settled { weight: candidate, prev_edge: Some(edge_id) });
                heap.push(std::cmp::Reverse(HeapEntry { weight: candidate, vertex: edge.to }));
            }
        }
    }

    settled
}
