//! # SQL Statements
//!
//! This module centralizes the SQL used against the `saved_route` and
//! `email_notification` tables.

pub const CREATE_SAVED_ROUTE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS saved_route (
        route_id TEXT NOT NULL PRIMARY KEY,
        source TEXT NOT NULL,
        destination TEXT NOT NULL,
        user_id TEXT NOT NULL,
        query_id TEXT NOT NULL,
        route TEXT NOT NULL
    );
";

pub const CREATE_SAVED_ROUTE_USER_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_saved_route_user_id ON saved_route (user_id);";

pub const CREATE_EMAIL_NOTIFICATION_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS email_notification (
        notification_id TEXT NOT NULL PRIMARY KEY,
        user_id TEXT,
        route_id TEXT
    );
";

/// Every statement needed to bring up an empty database, in order.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_SAVED_ROUTE_TABLE_SQL,
    CREATE_SAVED_ROUTE_USER_INDEX_SQL,
    CREATE_EMAIL_NOTIFICATION_TABLE_SQL,
];

pub const DROP_TABLES_SQL: &[&str] = &[
    "DROP TABLE IF EXISTS saved_route;",
    "DROP TABLE IF EXISTS email_notification;",
];

pub const INSERT_SAVED_ROUTE_SQL: &str = "
    INSERT INTO saved_route (route_id, source, destination, user_id, query_id, route)
    VALUES (?, ?, ?, ?, ?, ?);
";

pub const INSERT_EMAIL_NOTIFICATION_SQL: &str = "
    INSERT INTO email_notification (notification_id, user_id, route_id)
    VALUES (?, ?, ?);
";

pub const DELETE_SAVED_ROUTE_SQL: &str = "DELETE FROM saved_route WHERE route_id = ?;";

pub const DELETE_EMAIL_NOTIFICATION_SQL: &str =
    "DELETE FROM email_notification WHERE route_id = ?;";

pub const SELECT_SAVED_ROUTES_BY_USER_SQL: &str = "
    SELECT route_id, source, destination, user_id, query_id, route
    FROM saved_route
    WHERE user_id = ?
    ORDER BY rowid;
";
