//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the configuration, the
//! database handle and the downstream service clients, making them accessible
//! to all request handlers.

use crate::config::AppConfig;
use std::sync::Arc;
use transit_composite::{
    providers::{
        db, equipment::EquipmentClient, maps::MapsClient, notifier::NotificationClient,
    },
    EquipmentSource,
};
use turso::Database;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The database handle every persistence call opens its connection from.
    pub db: Database,
    /// The mapping service client.
    pub maps: MapsClient,
    /// Where station equipment status comes from.
    pub equipment: Arc<dyn EquipmentSource>,
    /// The email function client.
    pub notifier: NotificationClient,
}

/// Builds the shared application state from the configuration.
///
/// This opens the database, makes sure both tables exist and builds one HTTP
/// client per downstream service with that service's timeout.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let db = db::open_database(&config.db_url).await?;
    tracing::info!(db_path = %config.db_url, "Initialized local storage (SQLite).");
    // Ensure the database schema is up-to-date on startup.
    db::initialize_schema(&db).await?;

    let maps = MapsClient::new(config.services.maps.clone())?;
    let equipment = EquipmentClient::new(config.services.equipment.clone())?;
    let notifier = NotificationClient::new(config.services.email.clone())?;

    Ok(AppState {
        config: Arc::new(config),
        db,
        maps,
        equipment: Arc::new(equipment),
        notifier,
    })
}
