//! # Saved Route Handlers
//!
//! Handlers for saving, unsaving and listing the routes a user chose to keep.
//! Saving also dispatches a confirmation email; its outcome is reported in the
//! response but never fails the save.

use super::{
    link_with_query, AppError, AppState, SAVED_ROUTES_PATH, UNSAVE_ROUTE_PATH,
};
use crate::types::{
    RouteIdParams, SaveRouteRequest, SaveRouteResponse, SavedRoutesAndStationsResponse,
    UnsaveRouteResponse, UserParams,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;
use transit_composite::{providers::db, stations_for_routes, NewSavedRoute};

pub const ROUTE_SAVED_MESSAGE: &str = "Route saved successfully.";
pub const ROUTE_UNSAVED_MESSAGE: &str = "Route unsaved successfully.";

/// Accepts `route` either as a JSON document or as a string holding one.
fn parse_route(route: Value) -> Result<Value, AppError> {
    match route {
        Value::String(raw) => serde_json::from_str(&raw).map_err(|e| {
            AppError::Rejected(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("`route` is not valid JSON: {e}"),
            )
        }),
        other => Ok(other),
    }
}

/// Handler for `POST /save-route/`.
pub async fn save_route_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<SaveRouteRequest>, JsonRejection>,
) -> Result<Json<SaveRouteResponse>, AppError> {
    let Json(payload) = payload?;
    info!(
        user_id = %payload.user_id,
        query_id = %payload.query_id,
        "Received save-route request."
    );

    let route = parse_route(payload.route)?;
    let saved = db::insert_saved_route(
        &app_state.db,
        NewSavedRoute {
            source: payload.source,
            destination: payload.destination,
            user_id: payload.user_id,
            query_id: payload.query_id,
            route,
        },
    )
    .await?;

    let email_response = app_state
        .notifier
        .notify_saved_route(payload.to_email.as_deref(), &saved)
        .await;

    let links = vec![
        link_with_query(
            "unsave-route",
            UNSAVE_ROUTE_PATH,
            "PUT",
            &RouteIdParams {
                route_id: saved.route_id.clone(),
            },
        )?,
        link_with_query(
            "saved-routes",
            SAVED_ROUTES_PATH,
            "GET",
            &UserParams {
                user_id: saved.user_id.clone(),
            },
        )?,
    ];

    Ok(Json(SaveRouteResponse {
        message: ROUTE_SAVED_MESSAGE.to_string(),
        route_id: saved.route_id,
        user_id: saved.user_id,
        query_id: saved.query_id,
        email_response,
        links,
    }))
}

/// Handler for `PUT /unsave-route/`.
///
/// Unknown route ids succeed with the same message; nothing is deleted.
pub async fn unsave_route_handler(
    State(app_state): State<AppState>,
    params: Result<Query<RouteIdParams>, QueryRejection>,
) -> Result<Json<UnsaveRouteResponse>, AppError> {
    let Query(params) = params?;
    info!(route_id = %params.route_id, "Received unsave-route request.");

    db::delete_saved_route(&app_state.db, &params.route_id).await?;

    Ok(Json(UnsaveRouteResponse {
        message: ROUTE_UNSAVED_MESSAGE.to_string(),
        route_id: params.route_id,
    }))
}

/// Handler for `GET /get-saved-routes-and-stations/`.
///
/// `stations_from_saved_routes[i]` holds the equipment status for the subway
/// stations of `saved_routes[i]`.
pub async fn get_saved_routes_and_stations_handler(
    State(app_state): State<AppState>,
    params: Result<Query<UserParams>, QueryRejection>,
) -> Result<Json<SavedRoutesAndStationsResponse>, AppError> {
    let Query(params) = params?;
    info!(user_id = %params.user_id, "Received saved-routes request.");

    let saved_routes = db::saved_routes_by_user(&app_state.db, &params.user_id).await?;
    let routes: Vec<Value> = saved_routes.iter().map(|r| r.route.clone()).collect();
    let stations_from_saved_routes =
        stations_for_routes(app_state.equipment.as_ref(), &routes).await?;

    Ok(Json(SavedRoutesAndStationsResponse {
        saved_routes,
        stations_from_saved_routes,
    }))
}
