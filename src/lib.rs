//! A transit information engine: ingest a bus network (stops, road
//! distances, bus lines) and a batch of queries, then answer each query
//! against a time-weighted routing graph built once from that network.
//!
//! The routing subsystem — [`graph`], [`router`] and the graph-construction
//! half of [`database`] — is the core: a split-vertex encoding that charges
//! exactly one wait penalty per boarding while letting a passenger stay on
//! the same bus across multiple stops for free, backed by a Dijkstra solver
//! restricted to a fixed source set.

pub mod point;

pub mod graph;

pub mod router;
pub use router::Router;

pub mod transport;

pub mod database;
pub use database::{RouteAction, RouteResponse, TransportDatabase};

pub mod requests;
pub use requests::run_batch;

pub mod error;
pub use error::{Error, IngestError};
