//! # Mapping Service Client
//!
//! Talks to the mapping service that proxies transit directions and keeps a
//! per-user history of route queries.

use super::{send_with_retries, ServiceOptions};
use crate::errors::TransitError;
use reqwest::{Client as ReqwestClient, Response};
use serde_json::Value;
use tracing::debug;

const SERVICE_NAME: &str = "mapping service";

/// The routes returned for one origin/destination query.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    /// The id the mapping service assigned to this query, if it reports one.
    pub query_id: Option<Value>,
    pub routes: Vec<Value>,
}

/// A client for the mapping service.
#[derive(Clone, Debug)]
pub struct MapsClient {
    client: ReqwestClient,
    options: ServiceOptions,
}

impl MapsClient {
    pub fn new(options: ServiceOptions) -> Result<Self, TransitError> {
        let client = options.build_client()?;
        Ok(Self { client, options })
    }

    /// Requests transit routes from `source` to `destination`.
    ///
    /// The response must carry a `routes` array; anything else is reported as
    /// a malformed response.
    pub async fn routes(
        &self,
        source: &str,
        destination: &str,
        user_id: Option<&str>,
    ) -> Result<RouteQuery, TransitError> {
        let url = self.options.endpoint("routes");
        debug!(%url, source, destination, "--> Querying mapping service for routes");

        let mut query = vec![
            ("origin", source),
            ("destination", destination),
            ("mode", "transit"),
        ];
        if let Some(user_id) = user_id {
            query.push(("user_id", user_id));
        }

        let response = send_with_retries(SERVICE_NAME, self.options.retries, || {
            self.client.get(&url).query(&query)
        })
        .await
        .map_err(TransitError::MapsRequest)?;
        let mut body = json_body(response).await?;

        let routes = match body.get_mut("routes").map(Value::take) {
            Some(Value::Array(routes)) => routes,
            Some(other) => {
                return Err(TransitError::MapsMalformed(format!(
                    "`routes` is not an array: {other}"
                )))
            }
            None => {
                return Err(TransitError::MapsMalformed(
                    "response has no `routes` field".to_string(),
                ))
            }
        };
        let query_id = body.get_mut("query_id").map(Value::take);

        Ok(RouteQuery { query_id, routes })
    }

    /// Fetches a page of the user's past route queries, untouched.
    pub async fn query_history(
        &self,
        user_id: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value, TransitError> {
        let url = self.options.endpoint("queries");
        debug!(%url, user_id, ?limit, ?page, "--> Fetching query history");

        let mut query = vec![("user_id", user_id.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }

        let response = send_with_retries(SERVICE_NAME, self.options.retries, || {
            self.client.get(&url).query(&query)
        })
        .await
        .map_err(TransitError::MapsRequest)?;
        json_body(response).await
    }
}

async fn json_body(response: Response) -> Result<Value, TransitError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransitError::MapsApi {
            status: status.as_u16(),
            body,
        });
    }
    let text = response.text().await.map_err(TransitError::MapsRequest)?;
    serde_json::from_str(&text)
        .map_err(|e| TransitError::MapsMalformed(format!("response is not JSON: {e}")))
}
