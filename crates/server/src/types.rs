use serde::{Deserialize, Serialize};
use serde_json::Value;
use transit_composite::{SavedRoute, StationEquipment};

/// A hypermedia link to a related endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    pub method: String,
}

impl Link {
    pub fn new(rel: &str, href: impl Into<String>, method: &str) -> Self {
        Self {
            rel: rel.to_string(),
            href: href.into(),
            method: method.to_string(),
        }
    }
}

// --- Query Parameters ---

#[derive(Debug, Deserialize)]
pub struct RouteQueryParams {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub user_id: String,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserParams {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteIdParams {
    pub route_id: String,
}

// --- Request Bodies ---

/// The body of `POST /save-route/`.
///
/// `route` may be the route document itself or a string holding it.
#[derive(Debug, Deserialize)]
pub struct SaveRouteRequest {
    pub source: String,
    pub destination: String,
    pub user_id: String,
    pub query_id: String,
    pub route: Value,
    #[serde(default)]
    pub to_email: Option<String>,
}

// --- Response Bodies ---

#[derive(Debug, Serialize, Deserialize)]
pub struct RoutesAndStationsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<Value>,
    pub routes: Vec<Value>,
    pub stations: Vec<StationEquipment>,
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveRouteResponse {
    pub message: String,
    pub route_id: String,
    pub user_id: String,
    pub query_id: String,
    pub email_response: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnsaveRouteResponse {
    pub message: String,
    pub route_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedRoutesAndStationsResponse {
    pub saved_routes: Vec<SavedRoute>,
    pub stations_from_saved_routes: Vec<StationEquipment>,
}
