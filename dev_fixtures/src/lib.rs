//! Canonical fixture networks shared by demos, benchmarks and integration
//! tests, mirroring the teacher's `dev_utils` crate.

use std::collections::HashMap;

use serde_json::{json, Value};
use transit_catalogue::database::TransportDatabase;

/// A small hand-built network: two buses, one shared transfer stop, plus a
/// third disjoint bus reachable by nothing else in the network. Large
/// enough to exercise transfers without needing a real-world dataset.
///
/// Layout (road distances in metres):
///
/// ```text
/// Bus 256 (direct):   Biryulyovo Tovarnaya --1000m-- Universam --2000m-- Biryulyovo Passazhirskaya
/// Bus 750 (direct):   Universam --750m-- Pokrovskaya --1400m-- Biryusinka
/// Bus 900 (circular): Staraya Derevnya --900m-- Sputnik --500m-- Staraya Derevnya
/// ```
pub fn example_request_document() -> Value {
    json!({
        "routing_settings": { "bus_wait_time": 6, "bus_velocity": 40.0 },
        "base_requests": [
            {
                "type": "Stop",
                "name": "Biryulyovo Tovarnaya",
                "latitude": 55.574371,
                "longitude": 37.6517,
                "road_distances": { "Universam": 1000 }
            },
            {
                "type": "Stop",
                "name": "Universam",
                "latitude": 55.587655,
                "longitude": 37.645687,
                "road_distances": { "Biryulyovo Passazhirskaya": 2000, "Pokrovskaya": 750 }
            },
            {
                "type": "Stop",
                "name": "Biryulyovo Passazhirskaya",
                "latitude": 55.580999,
                "longitude": 37.659164,
                "road_distances": { "Universam": 2000 }
            },
            {
                "type": "Stop",
                "name": "Pokrovskaya",
                "latitude": 55.603601,
                "longitude": 37.635099,
                "road_distances": { "Biryusinka": 1400 }
            },
            {
                "type": "Stop",
                "name": "Biryusinka",
                "latitude": 55.581065,
                "longitude": 37.64839,
                "road_distances": {}
            },
            {
                "type": "Stop",
                "name": "Staraya Derevnya",
                "latitude": 59.988412,
                "longitude": 30.225071,
                "road_distances": { "Sputnik": 900 }
            },
            {
                "type": "Stop",
                "name": "Sputnik",
                "latitude": 59.994355,
                "longitude": 30.233857,
                "road_distances": { "Staraya Derevnya": 500 }
            },
            {
                "type": "Bus",
                "name": "256",
                "stops": ["Biryulyovo Tovarnaya", "Universam", "Biryulyovo Passazhirskaya"],
                "is_roundtrip": false
            },
            {
                "type": "Bus",
                "name": "750",
                "stops": ["Universam", "Pokrovskaya", "Biryusinka"],
                "is_roundtrip": false
            },
            {
                "type": "Bus",
                "name": "900",
                "stops": ["Staraya Derevnya", "Sputnik", "Staraya Derevnya"],
                "is_roundtrip": true
            }
        ],
        "stat_requests": []
    })
}

/// Builds and compiles the fixture network described by
/// [`example_request_document`], ready for direct [`TransportDatabase`]
/// queries (as opposed to driving it through [`transit_catalogue::run_batch`]).
pub fn build_example_database() -> TransportDatabase {
    let document = example_request_document();
    let mut db = TransportDatabase::new();

    for request in document["base_requests"].as_array().unwrap() {
        if request["type"] == "Stop" {
            let road_distances: HashMap<String, u32> = request["road_distances"]
                .as_object()
                .unwrap()
                .iter()
                .map(|(name, metres)| (name.clone(), metres.as_u64().unwrap() as u32))
                .collect();
            db.add_stop(
                request["name"].as_str().unwrap().to_string(),
                request["latitude"].as_f64().unwrap(),
                request["longitude"].as_f64().unwrap(),
                road_distances,
            )
            .unwrap();
        }
    }
    db.finalize_stops().unwrap();

    for request in document["base_requests"].as_array().unwrap() {
        if request["type"] == "Bus" {
            let stops: Vec<String> = request["stops"].as_array().unwrap().iter().map(|s| s.as_str().unwrap().to_string()).collect();
            db.add_bus(request["name"].as_str().unwrap().to_string(), stops, request["is_roundtrip"].as_bool().unwrap()).unwrap();
        }
    }

    let settings = &document["routing_settings"];
    db.set_route_settings(settings["bus_wait_time"].as_u64().unwrap() as u32, settings["bus_velocity"].as_f64().unwrap());
    db.build();
    db
}

/// A batch document with `stat_requests` filled in, exercising all three
/// query classes plus a couple of miss cases.
pub fn example_batch_document() -> Value {
    let mut document = example_request_document();
    document["stat_requests"] = json!([
        { "id": 1, "type": "Bus", "name": "256" },
        { "id": 2, "type": "Stop", "name": "Universam" },
        { "id": 3, "type": "Route", "from": "Biryulyovo Tovarnaya", "to": "Biryusinka" },
        { "id": 4, "type": "Route", "from": "Biryulyovo Tovarnaya", "to": "Sputnik" },
        { "id": 5, "type": "Bus", "name": "not-a-real-bus" },
    ]);
    document
}
