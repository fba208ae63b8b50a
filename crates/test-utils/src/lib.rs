use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use transit_composite::{providers::db, EquipmentSource, TransitError};
use turso::Database;

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub db: Database,
}

impl TestSetup {
    /// Creates a new, isolated in-memory database and initializes the schema.
    pub async fn new() -> Result<Self> {
        let db = db::open_database(":memory:").await?;
        db::initialize_schema(&db).await?;
        Ok(Self { db })
    }

    /// Counts the rows of `table` matching `route_id`.
    pub async fn count_rows_for_route(&self, table: &str, route_id: &str) -> Result<i64> {
        count_rows_for_route(&self.db, table, route_id).await
    }
}

/// Counts the rows of `table` in `db` whose `route_id` matches.
pub async fn count_rows_for_route(db: &Database, table: &str, route_id: &str) -> Result<i64> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            &format!("SELECT COUNT(*) FROM {table} WHERE route_id = ?"),
            turso::params![route_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| anyhow::anyhow!("COUNT(*) returned no row"))?;
    Ok(row.get(0)?)
}

// --- Recording Equipment Source ---

/// An `EquipmentSource` that answers from a fixed table and records every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingEquipmentSource {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingEquipmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-programs the payload returned for `station`.
    pub fn add_response(&self, station: &str, payload: Value) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(station.to_string(), payload);
    }

    /// Retrieves the stations requested so far, in call order.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EquipmentSource for RecordingEquipmentSource {
    async fn equipment_status(&self, station: &str) -> Result<Value, TransitError> {
        self.calls.lock().unwrap().push(station.to_string());

        let responses = self.responses.lock().unwrap();
        Ok(responses
            .get(station)
            .cloned()
            .unwrap_or_else(|| json!({ "station": station, "equipments": [] })))
    }
}

// --- Route Fixtures ---

/// A transit step between two stops on a vehicle of type `vehicle`.
pub fn transit_step(from: &str, to: &str, vehicle: &str) -> Value {
    json!({
        "travel_mode": "TRANSIT",
        "transit_details": {
            "departure_stop": { "name": from },
            "arrival_stop": { "name": to },
            "line": { "vehicle": { "type": vehicle, "name": "Subway" } }
        }
    })
}

/// A walking step, which never contributes a station.
pub fn walking_step() -> Value {
    json!({ "travel_mode": "WALKING", "html_instructions": "Walk to the platform" })
}

/// A single-leg route made of `steps`.
pub fn route_with_steps(steps: Vec<Value>) -> Value {
    json!({
        "summary": "",
        "legs": [{
            "start_address": "116th and Broadway, New York, NY 10027, USA",
            "steps": steps
        }]
    })
}
