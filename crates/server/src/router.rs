use super::{
    auth::middleware::{require_bearer_token, require_bearer_token_outside_public_paths},
    handlers::{self, QUERY_HISTORY_PATH, QUERY_ROUTES_PATH, SAVED_ROUTES_PATH, SAVE_ROUTE_PATH, UNSAVE_ROUTE_PATH},
    state::AppState,
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// The prefix of the token-guarded copies of the API routes.
pub const PROTECTED_PREFIX: &str = "/protected";

/// The five API routes, each answering with and without a trailing slash.
fn api_routes() -> Router<AppState> {
    [
        (
            QUERY_ROUTES_PATH,
            get(handlers::query_routes_and_stations_handler),
        ),
        (
            QUERY_HISTORY_PATH,
            get(handlers::query_all_routes_by_user_handler),
        ),
        (SAVE_ROUTE_PATH, post(handlers::save_route_handler)),
        (UNSAVE_ROUTE_PATH, put(handlers::unsave_route_handler)),
        (
            SAVED_ROUTES_PATH,
            get(handlers::get_saved_routes_and_stations_handler),
        ),
    ]
    .into_iter()
    .fold(Router::new(), |router, (path, handler)| {
        router
            .route(&format!("{path}/"), handler.clone())
            .route(path, handler)
    })
}

/// Creates the Axum router with all the application routes.
///
/// The API routes are served twice: open at the top level, and under
/// `/protected` behind bearer-token validation. When `auth.enabled` is set,
/// the top-level routes outside `auth.public_paths` require a token as well.
pub fn create_router(app_state: AppState) -> Router {
    let open = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .merge(api_routes());
    let open = if app_state.config.auth.enabled {
        open.route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_bearer_token_outside_public_paths,
        ))
    } else {
        open
    };

    let protected = api_routes().route_layer(middleware::from_fn_with_state(
        app_state.clone(),
        require_bearer_token,
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    open.nest(PROTECTED_PREFIX, protected)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
