//! The JSON request/response adapter between the in-memory engine and the
//! external batch document (§6 of the interface contract).
//!
//! This module owns the only `serde_json` dependency on the engine: it
//! parses `base_requests`/`routing_settings`/`stat_requests`, drives a
//! fresh [`TransportDatabase`] through its two ingest phases and the build
//! step, then serves `stat_requests` against the frozen result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::{RouteAction, TransportDatabase};
use crate::error::{Error, IngestError};

#[derive(Deserialize)]
struct RoutingSettingsWire {
    bus_wait_time: u32,
    bus_velocity: f64,
}

#[derive(Deserialize)]
struct StopRequestWire {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    road_distances: HashMap<String, u32>,
}

#[derive(Deserialize)]
struct BusRequestWire {
    name: String,
    stops: Vec<String>,
    is_roundtrip: bool,
}

#[derive(Deserialize)]
struct StopOrBusStatRequestWire {
    id: i64,
    name: String,
}

#[derive(Deserialize)]
struct RouteStatRequestWire {
    id: i64,
    from: String,
    to: String,
}

fn request_kind(raw: &Value) -> Result<&str, IngestError> {
    raw.get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| IngestError::MalformedInput("request is missing a string \"type\" field".to_string()))
}

fn request_id(raw: &Value) -> Result<i64, IngestError> {
    raw.get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| IngestError::MalformedInput("stat request is missing an integer \"id\" field".to_string()))
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum RouteItemWire {
    Wait { stop_name: String, time: f64 },
    Bus { bus: String, span_count: usize, time: f64 },
}

impl From<RouteAction> for RouteItemWire {
    fn from(action: RouteAction) -> Self {
        match action {
            RouteAction::Wait { stop_name, time } => RouteItemWire::Wait { stop_name, time },
            RouteAction::Bus { bus_number, span_count, time } => RouteItemWire::Bus { bus: bus_number, span_count, time },
        }
    }
}

/// Runs one full batch: absorbs `base_requests` and `routing_settings`,
/// builds the graph, and answers `stat_requests` in input order.
///
/// Ingest failures (malformed document, missing section, unknown request
/// type, missing road distance) are fatal and propagate as [`Error`].
/// Query-time failures (unknown stop/bus, no path) are not: they become an
/// ordinary `{error_message: "not found"}` element in the returned array.
pub fn run_batch(input: &str) -> Result<Value, Error> {
    let root: Value = serde_json::from_str(input)?;
    let obj = root
        .as_object()
        .ok_or_else(|| IngestError::MalformedInput("expected a JSON object at the top level".to_string()))?;

    let routing_settings = obj.get("routing_settings").ok_or(IngestError::MissingSection("routing_settings"))?;
    let base_requests = obj.get("base_requests").ok_or(IngestError::MissingSection("base_requests"))?;
    let stat_requests = obj.get("stat_requests").ok_or(IngestError::MissingSection("stat_requests"))?;

    let routing_settings: RoutingSettingsWire = serde_json::from_value(routing_settings.clone())?;
    let base_requests = base_requests
        .as_array()
        .ok_or_else(|| IngestError::MalformedInput("base_requests must be an array".to_string()))?;
    let stat_requests = stat_requests
        .as_array()
        .ok_or_else(|| IngestError::MalformedInput("stat_requests must be an array".to_string()))?;

    let mut db = TransportDatabase::new();

    // Phase 1: stops. Buses are skipped here, and checked against the two
    // known kinds so a typo surfaces as unknown-request-type rather than
    // silently vanishing.
    for raw in base_requests {
        match request_kind(raw)? {
            "Stop" => {
                let req: StopRequestWire = serde_json::from_value(raw.clone())?;
                db.add_stop(req.name, req.latitude, req.longitude, req.road_distances)?;
            }
            "Bus" => {}
            other => return Err(IngestError::UnknownRequestType(other.to_string()).into()),
        }
    }
    db.finalize_stops()?;

    // Phase 2: buses, resolving the stop handles phase 1 created.
    for raw in base_requests {
        if request_kind(raw)? == "Bus" {
            let req: BusRequestWire = serde_json::from_value(raw.clone())?;
            db.add_bus(req.name, req.stops, req.is_roundtrip)?;
        }
    }

    db.set_route_settings(routing_settings.bus_wait_time, routing_settings.bus_velocity);
    db.build();

    let mut responses = Vec::with_capacity(stat_requests.len());
    for raw in stat_requests {
        let id = request_id(raw)?;
        let response = match request_kind(raw)? {
            "Bus" => {
                let req: StopOrBusStatRequestWire = serde_json::from_value(raw.clone())?;
                match db.get_bus(&req.name) {
                    Some(info) => serde_json::json!({
                        "request_id": id,
                        "route_length": info.road_length_m,
                        "curvature": info.curvature,
                        "stop_count": info.num_stops,
                        "unique_stop_count": info.num_unique_stops,
                    }),
                    None => not_found(id),
                }
            }
            "Stop" => {
                let req: StopOrBusStatRequestWire = serde_json::from_value(raw.clone())?;
                match db.get_stop(&req.name) {
                    Some(buses) => serde_json::json!({ "request_id": id, "buses": buses }),
                    None => not_found(id),
                }
            }
            "Route" => {
                let req: RouteStatRequestWire = serde_json::from_value(raw.clone())?;
                match db.get_route(&req.from, &req.to).expect("route vertices are always abstract stop vertices, a supported source") {
                    Some(route) => {
                        let items: Vec<RouteItemWire> = route.actions.into_iter().map(RouteItemWire::from).collect();
                        serde_json::json!({ "request_id": id, "total_time": route.total_time, "items": items })
                    }
                    None => not_found(id),
                }
            }
            other => return Err(IngestError::UnknownRequestType(other.to_string()).into()),
        };
        responses.push(response);
    }

    Ok(Value::Array(responses))
}

fn not_found(request_id: i64) -> Value {
    serde_json::json!({ "request_id": request_id, "error_message": "not found" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_stop_direct_bus_document() -> Value {
        serde_json::json!({
            "routing_settings": { "bus_wait_time": 6, "bus_velocity": 36.0 },
            "base_requests": [
                { "type": "Stop", "name": "A", "latitude": 55.611087, "longitude": 37.20829, "road_distances": { "B": 1000 } },
                { "type": "Stop", "name": "B", "latitude": 55.595884, "longitude": 37.209755, "road_distances": { "C": 2000 } },
                { "type": "Stop", "name": "C", "latitude": 55.632761, "longitude": 37.333324, "road_distances": {} },
                { "type": "Bus", "name": "256", "stops": ["A", "B", "C"], "is_roundtrip": false },
            ],
            "stat_requests": [
                { "id": 1, "type": "Bus", "name": "256" },
                { "id": 2, "type": "Stop", "name": "B" },
                { "id": 3, "type": "Route", "from": "A", "to": "C" },
                { "id": 4, "type": "Bus", "name": "nonexistent" },
            ],
        })
    }

    #[test]
    fn end_to_end_batch_matches_expected_shape() {
        let output = run_batch(&three_stop_direct_bus_document().to_string()).unwrap();
        let responses = output.as_array().unwrap();
        assert_eq!(responses.len(), 4);

        assert_eq!(responses[0]["request_id"], 1);
        assert_eq!(responses[0]["route_length"], 6000);
        assert_eq!(responses[0]["stop_count"], 5);
        assert_eq!(responses[0]["unique_stop_count"], 3);

        assert_eq!(responses[1]["buses"], serde_json::json!(["256"]));

        assert_eq!(responses[2]["request_id"], 3);
        assert!((responses[2]["total_time"].as_f64().unwrap() - 11.0).abs() < 1e-9);
        assert_eq!(responses[2]["items"].as_array().unwrap().len(), 2);

        assert_eq!(responses[3]["error_message"], "not found");
    }

    #[test]
    fn missing_section_is_fatal() {
        let doc = serde_json::json!({ "base_requests": [], "stat_requests": [] });
        let err = run_batch(&doc.to_string()).unwrap_err();
        assert!(matches!(err, Error::Ingest(IngestError::MissingSection("routing_settings"))));
    }

    #[test]
    fn unknown_request_type_is_fatal() {
        let doc = serde_json::json!({
            "routing_settings": { "bus_wait_time": 1, "bus_velocity": 1.0 },
            "base_requests": [{ "type": "Train", "name": "A" }],
            "stat_requests": [],
        });
        let err = run_batch(&doc.to_string()).unwrap_err();
        assert!(matches!(err, Error::Ingest(IngestError::UnknownRequestType(_))));
    }

    #[test]
    fn queries_before_any_base_request_are_all_not_found() {
        let doc = serde_json::json!({
            "routing_settings": { "bus_wait_time": 5, "bus_velocity": 10.0 },
            "base_requests": [],
            "stat_requests": [
                { "id": 1, "type": "Stop", "name": "A" },
                { "id": 2, "type": "Bus", "name": "1" },
                { "id": 3, "type": "Route", "from": "A", "to": "B" },
            ],
        });
        let output = run_batch(&doc.to_string()).unwrap();
        for response in output.as_array().unwrap() {
            assert_eq!(response["error_message"], "not found");
        }
    }

    #[test]
    fn missing_distance_is_fatal() {
        let doc = serde_json::json!({
            "routing_settings": { "bus_wait_time": 5, "bus_velocity": 10.0 },
            "base_requests": [
                { "type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": {} },
                { "type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.01, "road_distances": {} },
                { "type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false },
            ],
            "stat_requests": [],
        });
        let err = run_batch(&doc.to_string()).unwrap_err();
        assert!(matches!(err, Error::Ingest(IngestError::MissingDistance { .. })));
    }

    #[test]
    fn circular_bus_stop_count_is_n() {
        let doc = serde_json::json!({
            "routing_settings": { "bus_wait_time": 5, "bus_velocity": 10.0 },
            "base_requests": [
                { "type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": { "B": 100 } },
                { "type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.01, "road_distances": { "C": 100 } },
                { "type": "Stop", "name": "C", "latitude": 0.01, "longitude": 0.01, "road_distances": { "A": 100 } },
                { "type": "Bus", "name": "1", "stops": ["A", "B", "C", "A"], "is_roundtrip": true },
            ],
            "stat_requests": [{ "id": 1, "type": "Bus", "name": "1" }],
        });
        let output = run_batch(&doc.to_string()).unwrap();
        let response = &output.as_array().unwrap()[0];
        assert_eq!(response["stop_count"], 4);
        assert_eq!(response["unique_stop_count"], 3);
    }
}
