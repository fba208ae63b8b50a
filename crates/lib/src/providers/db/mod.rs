//! # Saved-Route Persistence
//!
//! Every operation takes the shared `turso::Database` handle, opens its own
//! connection for the duration of the call and drops it on return. Writes
//! that touch both tables run inside a single transaction.

pub mod sql;

use crate::{
    errors::TransitError,
    types::{DeletedRows, EmailNotification, NewSavedRoute, SavedRoute},
};
use std::{future::Future, path::Path};
use tracing::{error, info};
use turso::{params, Connection, Database, Row};
use uuid::Uuid;

/// Opens a database from a file path, or `":memory:"` for an in-memory one.
///
/// Missing parent directories of a file path are created.
pub async fn open_database(db_url: &str) -> Result<Database, TransitError> {
    if db_url != ":memory:" {
        if let Some(parent) = Path::new(db_url)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(turso::Builder::new_local(db_url).build().await?)
}

/// Creates the tables if they do not exist yet. Idempotent.
pub async fn initialize_schema(db: &Database) -> Result<(), TransitError> {
    let conn = db.connect()?;
    for statement in sql::ALL_TABLE_CREATION_SQL {
        conn.execute(statement, ()).await?;
    }
    Ok(())
}

/// Drops both tables and recreates them empty.
pub async fn reset_schema(db: &Database) -> Result<(), TransitError> {
    let conn = db.connect()?;
    for statement in sql::DROP_TABLES_SQL {
        conn.execute(statement, ()).await?;
    }
    info!("Dropped saved_route and email_notification tables.");
    initialize_schema(db).await
}

/// Runs `body` between `BEGIN` and `COMMIT`, rolling back if it fails.
async fn in_transaction<'c, T, F, Fut>(conn: &'c Connection, body: F) -> Result<T, TransitError>
where
    F: FnOnce(&'c Connection) -> Fut,
    Fut: Future<Output = Result<T, TransitError>>,
{
    conn.execute("BEGIN TRANSACTION", ()).await?;
    match body(conn).await {
        Ok(value) => {
            conn.execute("COMMIT", ()).await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = conn.execute("ROLLBACK", ()).await {
                error!("Rollback failed after '{e}': {rollback_err}");
            }
            Err(e)
        }
    }
}

/// Inserts one `email_notification` row on an existing connection.
pub async fn insert_email_notification(
    conn: &Connection,
    notification: &EmailNotification,
) -> Result<(), TransitError> {
    conn.execute(
        sql::INSERT_EMAIL_NOTIFICATION_SQL,
        params![
            notification.notification_id.clone(),
            notification.user_id.clone(),
            notification.route_id.clone()
        ],
    )
    .await?;
    Ok(())
}

/// Saves a route together with its notification record.
///
/// A fresh `route_id` and `notification_id` are generated. Both rows are
/// written in one transaction: if either insert fails, neither is kept.
pub async fn insert_saved_route(
    db: &Database,
    new_route: NewSavedRoute,
) -> Result<SavedRoute, TransitError> {
    let route_json = serde_json::to_string(&new_route.route)?;
    let saved = new_route.into_saved(Uuid::new_v4().to_string());
    let notification = EmailNotification {
        notification_id: Uuid::new_v4().to_string(),
        user_id: saved.user_id.clone(),
        route_id: saved.route_id.clone(),
    };

    let conn = db.connect()?;
    let row = &saved;
    in_transaction(&conn, |conn| async move {
        conn.execute(
            sql::INSERT_SAVED_ROUTE_SQL,
            params![
                row.route_id.clone(),
                row.source.clone(),
                row.destination.clone(),
                row.user_id.clone(),
                row.query_id.clone(),
                route_json
            ],
        )
        .await?;
        insert_email_notification(conn, &notification).await
    })
    .await?;

    info!(route_id = %saved.route_id, user_id = %saved.user_id, "Saved route and notification record.");
    Ok(saved)
}

/// Deletes a saved route and its notification records.
///
/// Missing ids are not an error; the returned counts are simply zero.
pub async fn delete_saved_route(db: &Database, route_id: &str) -> Result<DeletedRows, TransitError> {
    let conn = db.connect()?;
    let deleted = in_transaction(&conn, |conn| async move {
        let saved_routes = conn
            .execute(sql::DELETE_SAVED_ROUTE_SQL, params![route_id])
            .await?;
        let email_notifications = conn
            .execute(sql::DELETE_EMAIL_NOTIFICATION_SQL, params![route_id])
            .await?;
        Ok(DeletedRows {
            saved_routes,
            email_notifications,
        })
    })
    .await?;

    info!(route_id, ?deleted, "Deleted saved route.");
    Ok(deleted)
}

/// Returns every route saved by `user_id`.
pub async fn saved_routes_by_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<SavedRoute>, TransitError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(sql::SELECT_SAVED_ROUTES_BY_USER_SQL, params![user_id])
        .await?;

    let mut saved_routes = Vec::new();
    while let Some(row) = rows.next().await? {
        saved_routes.push(saved_route_from_row(&row)?);
    }
    Ok(saved_routes)
}

fn saved_route_from_row(row: &Row) -> Result<SavedRoute, TransitError> {
    let route_json: String = row.get(5)?;
    Ok(SavedRoute {
        route_id: row.get(0)?,
        source: row.get(1)?,
        destination: row.get(2)?,
        user_id: row.get(3)?,
        query_id: row.get(4)?,
        route: serde_json::from_str(&route_json)?,
    })
}
