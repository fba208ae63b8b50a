//! # Core Data Types
//!
//! Records persisted by the service and the intermediate shapes produced by the
//! routing aggregator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The vehicle type whose stations have equipment status.
pub const SUBWAY_VEHICLE_TYPE: &str = "SUBWAY";

/// A route the user chose to keep, as stored in the `saved_route` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRoute {
    pub route_id: String,
    pub source: String,
    pub destination: String,
    pub user_id: String,
    pub query_id: String,
    /// The full route document, stored as serialized JSON.
    pub route: Value,
}

/// The caller-provided part of a `SavedRoute`; the id is generated on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSavedRoute {
    pub source: String,
    pub destination: String,
    pub user_id: String,
    pub query_id: String,
    pub route: Value,
}

impl NewSavedRoute {
    pub(crate) fn into_saved(self, route_id: String) -> SavedRoute {
        SavedRoute {
            route_id,
            source: self.source,
            destination: self.destination,
            user_id: self.user_id,
            query_id: self.query_id,
            route: self.route,
        }
    }
}

/// A row of the `email_notification` table linking a user to a saved route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailNotification {
    pub notification_id: String,
    pub user_id: String,
    pub route_id: String,
}

/// The transit stations of one route with their vehicle types.
///
/// `stations[i]` is served by `vehicle_types[i]`; both lists always have the
/// same length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteStations {
    pub stations: Vec<String>,
    pub vehicle_types: Vec<String>,
}

impl RouteStations {
    /// Records one stop served by `vehicle_type`.
    pub fn push(&mut self, station: String, vehicle_type: String) {
        self.stations.push(station);
        self.vehicle_types.push(vehicle_type);
    }

    /// Iterates `(station, vehicle_type)` pairs in route order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stations
            .iter()
            .map(String::as_str)
            .zip(self.vehicle_types.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Station name to raw equipment-status payload, for one route.
pub type StationEquipment = Map<String, Value>;

/// Row counts removed by a delete across both tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletedRows {
    pub saved_routes: u64,
    pub email_notifications: u64,
}
