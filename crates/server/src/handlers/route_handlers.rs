//! # Route Query Handlers
//!
//! Handlers that ask the mapping service for routes, either fresh ones
//! (enriched with station equipment status) or the user's query history.

use super::{
    link_with_query, AppError, AppState, QUERY_HISTORY_PATH, SAVED_ROUTES_PATH, SAVE_ROUTE_PATH,
};
use crate::types::{HistoryParams, Link, RouteQueryParams, RoutesAndStationsResponse, UserParams};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::Value;
use tracing::info;
use transit_composite::stations_for_routes;

/// Handler for `GET /query-routes-and-stations/`.
///
/// Fetches transit routes from the mapping service, then the equipment status
/// of every subway station on them. `stations[i]` belongs to `routes[i]`.
pub async fn query_routes_and_stations_handler(
    State(app_state): State<AppState>,
    params: Result<Query<RouteQueryParams>, QueryRejection>,
) -> Result<Json<RoutesAndStationsResponse>, AppError> {
    let Query(params) = params?;
    info!(
        source = %params.source,
        destination = %params.destination,
        "Received route query."
    );

    let route_query = app_state
        .maps
        .routes(
            &params.source,
            &params.destination,
            params.user_id.as_deref(),
        )
        .await?;
    let stations = stations_for_routes(app_state.equipment.as_ref(), &route_query.routes).await?;

    let mut links = vec![Link::new("save-route", format!("{SAVE_ROUTE_PATH}/"), "POST")];
    if let Some(user_id) = params.user_id {
        let user = UserParams { user_id };
        links.push(link_with_query("saved-routes", SAVED_ROUTES_PATH, "GET", &user)?);
        links.push(link_with_query("query-history", QUERY_HISTORY_PATH, "GET", &user)?);
    }

    Ok(Json(RoutesAndStationsResponse {
        query_id: route_query.query_id,
        routes: route_query.routes,
        stations,
        links,
    }))
}

/// Handler for `GET /query-all-routes-by-user/`.
///
/// Relays the user's query history from the mapping service unchanged.
pub async fn query_all_routes_by_user_handler(
    State(app_state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(params) = params?;
    info!(user_id = %params.user_id, "Received query history request.");

    let history = app_state
        .maps
        .query_history(&params.user_id, params.limit, params.page)
        .await?;
    Ok(Json(history))
}
