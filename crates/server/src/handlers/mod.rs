//! # API Handlers
//!
//! This module organizes the Axum handlers by concern and re-exports them so
//! the router can refer to every endpoint through `handlers::*`.

pub mod general;
pub mod route_handlers;
pub mod saved_route_handlers;

pub use self::{general::*, route_handlers::*, saved_route_handlers::*};

pub(crate) use crate::{errors::AppError, state::AppState};

use crate::types::Link;
use serde::Serialize;

pub const SAVE_ROUTE_PATH: &str = "/save-route";
pub const UNSAVE_ROUTE_PATH: &str = "/unsave-route";
pub const SAVED_ROUTES_PATH: &str = "/get-saved-routes-and-stations";
pub const QUERY_HISTORY_PATH: &str = "/query-all-routes-by-user";
pub const QUERY_ROUTES_PATH: &str = "/query-routes-and-stations";

/// Builds a link whose href carries `params` as an urlencoded query string.
pub(crate) fn link_with_query<T: Serialize>(
    rel: &str,
    path: &str,
    method: &str,
    params: &T,
) -> Result<Link, AppError> {
    let query = serde_urlencoded::to_string(params)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode link query: {e}")))?;
    Ok(Link::new(rel, format!("{path}/?{query}"), method))
}
