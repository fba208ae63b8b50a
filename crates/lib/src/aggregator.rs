//! # Routing Aggregator
//!
//! Turns the route documents returned by the mapping service (or stored in
//! `saved_route`) into per-route station lists. Only the keys needed for the
//! walk are deserialized; everything else in a route is ignored.

use crate::{errors::TransitError, types::RouteStations};
use serde::Deserialize;
use serde_json::Value;

const TRANSIT_TRAVEL_MODE: &str = "TRANSIT";

#[derive(Deserialize)]
struct RouteShape {
    legs: Vec<LegShape>,
}

#[derive(Deserialize)]
struct LegShape {
    steps: Vec<StepShape>,
}

#[derive(Deserialize)]
struct StepShape {
    travel_mode: String,
    #[serde(default)]
    transit_details: Option<TransitDetails>,
}

#[derive(Deserialize)]
struct TransitDetails {
    departure_stop: Stop,
    arrival_stop: Stop,
    line: Line,
}

#[derive(Deserialize)]
struct Stop {
    name: String,
}

#[derive(Deserialize)]
struct Line {
    vehicle: Vehicle,
}

#[derive(Deserialize)]
struct Vehicle {
    #[serde(rename = "type")]
    kind: String,
}

/// Extracts the departure and arrival stations of every transit step.
///
/// The result is index-aligned with `routes`. Each transit step contributes its
/// departure and arrival stop, both tagged with the step's vehicle type. Steps
/// with any other travel mode contribute nothing. A route missing `legs`,
/// `steps` or the transit details of a transit step fails the whole call.
pub fn extract_stations(routes: &[Value]) -> Result<Vec<RouteStations>, TransitError> {
    routes
        .iter()
        .enumerate()
        .map(|(index, route)| stations_for_route(index, route))
        .collect()
}

fn stations_for_route(index: usize, route: &Value) -> Result<RouteStations, TransitError> {
    let shape = RouteShape::deserialize(route).map_err(|e| TransitError::MalformedRoute {
        index,
        reason: e.to_string(),
    })?;

    let mut stations = RouteStations::default();
    for step in shape.legs.into_iter().flat_map(|leg| leg.steps) {
        if step.travel_mode != TRANSIT_TRAVEL_MODE {
            continue;
        }
        let details = step
            .transit_details
            .ok_or_else(|| TransitError::MalformedRoute {
                index,
                reason: "transit step has no `transit_details`".to_string(),
            })?;
        let vehicle_type = details.line.vehicle.kind;
        stations.push(details.departure_stop.name, vehicle_type.clone());
        stations.push(details.arrival_stop.name, vehicle_type);
    }
    Ok(stations)
}
