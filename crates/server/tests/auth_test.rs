//! # Authentication Middleware Tests
//!
//! The `/protected` copies of the API routes always require a valid HS256
//! bearer token. With `auth.enabled`, every matched top-level route outside
//! the public paths requires one too.

mod common;

use anyhow::Result;
use common::{generate_jwt, generate_jwt_with_expiry, TestApp};
use serde_json::{json, Value};

const SAVED_ROUTES_URL: &str = "/get-saved-routes-and-stations/?user_id=u1";
const PROTECTED_SAVED_ROUTES_URL: &str = "/protected/get-saved-routes-and-stations/?user_id=u1";

#[tokio::test]
async fn test_public_paths_need_no_token() -> Result<()> {
    let app = TestApp::spawn_with_auth(true).await?;

    for path in ["/", "/health"] {
        let response = app.client.get(app.url(path)).send().await?;
        assert!(
            response.status().is_success(),
            "{path} should be public, got {}",
            response.status()
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() -> Result<()> {
    let app = TestApp::spawn_with_auth(true).await?;

    let response = app.client.get(app.url(SAVED_ROUTES_URL)).send().await?;

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Missing bearer token.");
    Ok(())
}

#[tokio::test]
async fn test_valid_token_is_accepted() -> Result<()> {
    let app = TestApp::spawn_with_auth(true).await?;
    let token = generate_jwt("u1", &app.app_state.config.jwt_secret)?;

    let response = app
        .client
        .get(app.url(SAVED_ROUTES_URL))
        .bearer_auth(token)
        .send()
        .await?;

    assert_eq!(200, response.status().as_u16());
    Ok(())
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() -> Result<()> {
    let app = TestApp::spawn_with_auth(true).await?;
    let token = generate_jwt("u1", "not-the-server-secret")?;

    let response = app
        .client
        .get(app.url(SAVED_ROUTES_URL))
        .bearer_auth(token)
        .send()
        .await?;

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Invalid or expired token.");
    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_rejected() -> Result<()> {
    let app = TestApp::spawn_with_auth(true).await?;
    // Long expired, well outside any validation leeway.
    let token = generate_jwt_with_expiry("u1", &app.app_state.config.jwt_secret, 1_000)?;

    let response = app
        .client
        .put(app.url("/unsave-route/?route_id=abc"))
        .bearer_auth(token)
        .send()
        .await?;

    assert_eq!(401, response.status().as_u16());
    Ok(())
}

#[tokio::test]
async fn test_auth_disabled_lets_requests_through() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.client.get(app.url(SAVED_ROUTES_URL)).send().await?;

    assert_eq!(200, response.status().as_u16());
    Ok(())
}

#[tokio::test]
async fn test_open_and_protected_routes_are_served_side_by_side() -> Result<()> {
    let app = TestApp::spawn().await?;

    let open = app.client.get(app.url(SAVED_ROUTES_URL)).send().await?;
    assert_eq!(200, open.status().as_u16());

    let protected = app
        .client
        .get(app.url(PROTECTED_SAVED_ROUTES_URL))
        .send()
        .await?;
    assert_eq!(401, protected.status().as_u16());
    let body: Value = protected.json().await?;
    assert_eq!(body["error"], "Missing bearer token.");

    let token = generate_jwt("u1", &app.app_state.config.jwt_secret)?;
    let authorized = app
        .client
        .get(app.url(PROTECTED_SAVED_ROUTES_URL))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(200, authorized.status().as_u16());
    Ok(())
}

#[tokio::test]
async fn test_protected_save_and_unsave_round_trip() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = generate_jwt("u1", &app.app_state.config.jwt_secret)?;

    let saved: Value = app
        .client
        .post(app.url("/protected/save-route"))
        .bearer_auth(&token)
        .json(&json!({
            "source": "A",
            "destination": "B",
            "user_id": "u1",
            "query_id": "q1",
            "route": { "legs": [] },
        }))
        .send()
        .await?
        .json()
        .await?;
    let route_id = saved["route_id"].as_str().unwrap_or_default().to_string();
    assert_eq!(app.count_rows_for_route("saved_route", &route_id).await?, 1);

    let unsave_url = app.url(&format!("/protected/unsave-route/?route_id={route_id}"));
    let rejected = app.client.put(&unsave_url).send().await?;
    assert_eq!(401, rejected.status().as_u16());
    assert_eq!(app.count_rows_for_route("saved_route", &route_id).await?, 1);

    let unsaved = app.client.put(&unsave_url).bearer_auth(&token).send().await?;
    assert_eq!(200, unsaved.status().as_u16());
    assert_eq!(app.count_rows_for_route("saved_route", &route_id).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_general_endpoints_are_not_mirrored_under_protected() -> Result<()> {
    let app = TestApp::spawn_with_auth(true).await?;

    let response = app.client.get(app.url("/protected/health")).send().await?;

    // Only the API routes are mirrored under the prefix.
    assert_eq!(404, response.status().as_u16());
    Ok(())
}
