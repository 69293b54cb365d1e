//! Crate-wide error types.
//!
//! Errors raised while absorbing the input document are fatal: a malformed
//! network makes every subsequent query meaningless, so they abort the
//! batch. Errors raised while answering a single query are not represented
//! here at all — [`crate::requests::run_batch`] turns them into an ordinary
//! `{error_message: "not found"}` response element, because a bad query
//! must not abort the rest of the batch.

use thiserror::Error;

/// Failures that can occur while absorbing `base_requests` / `routing_settings`
/// and building the routing graph. All are fatal: the caller should abort the
/// batch rather than attempt to answer any `stat_requests`.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("missing section: {0}")]
    MissingSection(&'static str),

    #[error("unknown request type: {0}")]
    UnknownRequestType(String),

    #[error("no road distance defined between '{from}' and '{to}' in either direction")]
    MissingDistance { from: String, to: String },

    #[error("unknown stop referenced by bus '{bus}': {stop}")]
    UnknownStopReference { bus: String, stop: String },

    #[error("road_distances for '{from}' references unknown stop '{to}'")]
    UnknownStopInRoadDistances { from: String, to: String },

    #[error("duplicate stop name: {0}")]
    DuplicateStop(String),

    #[error("duplicate bus number: {0}")]
    DuplicateBus(String),
}

/// Top-level error returned by the CLI driver.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("failed to parse input document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
