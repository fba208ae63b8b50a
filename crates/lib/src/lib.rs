//! # Transit Composite
//!
//! The core of the transit composite service: it turns route documents from a
//! mapping service into station lists, looks up equipment status for the
//! subway stations on those routes, and persists the routes users choose to
//! keep.

pub mod aggregator;
pub mod equipment;
pub mod errors;
pub mod providers;
pub mod types;

pub use aggregator::extract_stations;
pub use equipment::{fetch_equipment_status, EquipmentSource};
pub use errors::TransitError;
pub use types::{
    DeletedRows, EmailNotification, NewSavedRoute, RouteStations, SavedRoute, StationEquipment,
};

use serde_json::Value;
use tracing::info;

/// Extracts the stations of `routes` and fetches their equipment status.
///
/// The result holds one station-to-status map per route, in input order.
pub async fn stations_for_routes(
    source: &dyn EquipmentSource,
    routes: &[Value],
) -> Result<Vec<StationEquipment>, TransitError> {
    let stations = extract_stations(routes)?;
    info!(
        "Extracted {} transit stop(s) from {} route(s).",
        stations.iter().map(RouteStations::len).sum::<usize>(),
        routes.len()
    );
    fetch_equipment_status(source, &stations).await
}
