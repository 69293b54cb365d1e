//! End-to-end fixtures driven through [`transit_catalogue::run_batch`], the
//! same entry point the CLI uses. Each test builds its own JSON document in
//! memory rather than reading a file, per the canonical scenarios.

use serde_json::json;

fn run(document: serde_json::Value) -> serde_json::Value {
    transit_catalogue::run_batch(&document.to_string()).expect("fixture documents are well-formed")
}

#[test]
fn single_direct_bus_three_stops() {
    let output = run(json!({
        "routing_settings": { "bus_wait_time": 6, "bus_velocity": 36.0 },
        "base_requests": [
            { "type": "Stop", "name": "A", "latitude": 55.611087, "longitude": 37.20829, "road_distances": { "B": 1000 } },
            { "type": "Stop", "name": "B", "latitude": 55.595884, "longitude": 37.209755, "road_distances": { "C": 2000 } },
            { "type": "Stop", "name": "C", "latitude": 55.632761, "longitude": 37.333324, "road_distances": {} },
            { "type": "Bus", "name": "256", "stops": ["A", "B", "C"], "is_roundtrip": false }
        ],
        "stat_requests": [
            { "id": 1, "type": "Bus", "name": "256" },
            { "id": 2, "type": "Route", "from": "A", "to": "C" }
        ]
    }));
    let responses = output.as_array().unwrap();

    assert_eq!(responses[0]["stop_count"], 5);
    assert_eq!(responses[0]["unique_stop_count"], 3);
    assert_eq!(responses[0]["route_length"], 6000);
    let curvature = responses[0]["curvature"].as_f64().unwrap();
    assert!(curvature >= 1.0);

    let total_time = responses[1]["total_time"].as_f64().unwrap();
    assert!((total_time - 11.0).abs() < 1e-9);
    let items = responses[1]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "Wait");
    assert_eq!(items[0]["time"], 6.0);
    assert_eq!(items[1]["type"], "Bus");
    assert_eq!(items[1]["span_count"], 2);
}

#[test]
fn circular_bus_of_three_unique_stops() {
    let output = run(json!({
        "routing_settings": { "bus_wait_time": 5, "bus_velocity": 40.0 },
        "base_requests": [
            { "type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": { "B": 100 } },
            { "type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.01, "road_distances": { "C": 100 } },
            { "type": "Stop", "name": "C", "latitude": 0.01, "longitude": 0.01, "road_distances": { "A": 100 } },
            { "type": "Bus", "name": "K", "stops": ["A", "B", "C", "A"], "is_roundtrip": true }
        ],
        "stat_requests": [{ "id": 1, "type": "Bus", "name": "K" }]
    }));
    let response = &output.as_array().unwrap()[0];
    assert_eq!(response["stop_count"], 4);
    assert_eq!(response["unique_stop_count"], 3);
}

#[test]
fn two_intersecting_buses_share_a_transfer_stop() {
    let output = run(json!({
        "routing_settings": { "bus_wait_time": 6, "bus_velocity": 40.0 },
        "base_requests": [
            { "type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": { "Hub": 1000 } },
            { "type": "Stop", "name": "Hub", "latitude": 0.0, "longitude": 0.01, "road_distances": { "B": 1000 } },
            { "type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.02, "road_distances": {} },
            { "type": "Bus", "name": "1", "stops": ["A", "Hub"], "is_roundtrip": false },
            { "type": "Bus", "name": "2", "stops": ["Hub", "B"], "is_roundtrip": false }
        ],
        "stat_requests": [{ "id": 1, "type": "Route", "from": "A", "to": "B" }]
    }));
    let items = output[0]["items"].as_array().unwrap();
    let wait_count = items.iter().filter(|item| item["type"] == "Wait").count();
    let bus_count = items.iter().filter(|item| item["type"] == "Bus").count();
    assert_eq!(wait_count, 2);
    assert_eq!(bus_count, 2);
}

#[test]
fn unreachable_target_is_not_found() {
    let output = run(json!({
        "routing_settings": { "bus_wait_time": 5, "bus_velocity": 40.0 },
        "base_requests": [
            { "type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": { "B": 1000 } },
            { "type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.01, "road_distances": {} },
            { "type": "Stop", "name": "X", "latitude": 10.0, "longitude": 10.0, "road_distances": { "Y": 1000 } },
            { "type": "Stop", "name": "Y", "latitude": 10.0, "longitude": 10.01, "road_distances": {} },
            { "type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false },
            { "type": "Bus", "name": "2", "stops": ["X", "Y"], "is_roundtrip": false }
        ],
        "stat_requests": [{ "id": 1, "type": "Route", "from": "A", "to": "X" }]
    }));
    assert_eq!(output[0]["error_message"], "not found");
}

#[test]
fn same_source_and_target_has_no_items() {
    let output = run(json!({
        "routing_settings": { "bus_wait_time": 5, "bus_velocity": 40.0 },
        "base_requests": [
            { "type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": { "B": 1000 } },
            { "type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.01, "road_distances": {} },
            { "type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false }
        ],
        "stat_requests": [{ "id": 1, "type": "Route", "from": "A", "to": "A" }]
    }));
    assert_eq!(output[0]["total_time"], 0.0);
    assert_eq!(output[0]["items"].as_array().unwrap().len(), 0);
}

#[test]
fn queries_before_any_base_request_are_all_not_found() {
    let output = run(json!({
        "routing_settings": { "bus_wait_time": 5, "bus_velocity": 40.0 },
        "base_requests": [],
        "stat_requests": [
            { "id": 1, "type": "Stop", "name": "A" },
            { "id": 2, "type": "Bus", "name": "1" },
            { "id": 3, "type": "Route", "from": "A", "to": "B" }
        ]
    }));
    for response in output.as_array().unwrap() {
        assert_eq!(response["error_message"], "not found");
    }
}

#[test]
fn stop_summary_is_sorted_and_deduplicated() {
    let output = run(json!({
        "routing_settings": { "bus_wait_time": 5, "bus_velocity": 40.0 },
        "base_requests": [
            { "type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": { "B": 1000 } },
            { "type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.01, "road_distances": {} },
            { "type": "Bus", "name": "32", "stops": ["A", "B"], "is_roundtrip": false },
            { "type": "Bus", "name": "16", "stops": ["A", "B"], "is_roundtrip": false }
        ],
        "stat_requests": [{ "id": 1, "type": "Stop", "name": "A" }]
    }));
    assert_eq!(output[0]["buses"], json!(["16", "32"]));
}
