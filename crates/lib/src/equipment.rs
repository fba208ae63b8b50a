//! # Equipment-Status Fetcher
//!
//! Looks up elevator and escalator status for the subway stations found by the
//! routing aggregator.

use crate::{
    errors::TransitError,
    types::{RouteStations, StationEquipment, SUBWAY_VEHICLE_TYPE},
};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use tracing::info;

/// A source of equipment status, keyed by station name.
#[async_trait]
pub trait EquipmentSource: Send + Sync + Debug {
    /// Returns the raw status payload for one station.
    async fn equipment_status(&self, station: &str) -> Result<Value, TransitError>;
}

/// Fetches equipment status for every subway station of every route.
///
/// Calls are made one after another. Within a route, a station that already
/// has an entry is not requested again; nothing is shared between routes or
/// across calls. The first failing request fails the whole call.
pub async fn fetch_equipment_status(
    source: &dyn EquipmentSource,
    routes: &[RouteStations],
) -> Result<Vec<StationEquipment>, TransitError> {
    let mut all_info = Vec::with_capacity(routes.len());

    for route in routes {
        let mut info = StationEquipment::new();
        for (station, vehicle_type) in route.iter() {
            if vehicle_type != SUBWAY_VEHICLE_TYPE || info.contains_key(station) {
                continue;
            }
            let status = source.equipment_status(station).await?;
            info.insert(station.to_string(), status);
        }
        info!("Collected equipment status for {} station(s).", info.len());
        all_info.push(info);
    }

    Ok(all_info)
}
