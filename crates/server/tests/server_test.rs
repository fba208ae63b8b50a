//! # Server Endpoint Tests
//!
//! Integration tests for the general endpoints and router-wide behavior:
//! health checks, trailing-slash handling, CORS and unknown paths.

mod common;

use anyhow::Result;
use common::TestApp;

#[tokio::test]
async fn test_root_and_health_check_endpoints() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;

    // --- Test Root Endpoint ---
    let root_response = app
        .client
        .get(app.url("/"))
        .send()
        .await
        .expect("Failed to execute request to /");

    // Assert
    assert!(root_response.status().is_success());
    assert_eq!(
        "transit composite service is running.",
        root_response.text().await?
    );

    // --- Test Health Check Endpoint ---
    let health_response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request to /health");

    // Assert
    assert!(health_response.status().is_success());
    assert_eq!("OK", health_response.text().await?);

    Ok(())
}

#[tokio::test]
async fn test_api_paths_accept_both_slash_forms() -> Result<()> {
    let app = TestApp::spawn().await?;

    for path in [
        "/get-saved-routes-and-stations/?user_id=nobody",
        "/get-saved-routes-and-stations?user_id=nobody",
    ] {
        let response = app.client.get(app.url(path)).send().await?;
        assert_eq!(200, response.status().as_u16(), "GET {path} failed");
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["saved_routes"], serde_json::json!([]));
    }

    Ok(())
}

#[tokio::test]
async fn test_unknown_path_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.client.get(app.url("/no-such-endpoint")).send().await?;

    assert_eq!(404, response.status().as_u16());
    Ok(())
}

#[tokio::test]
async fn test_cors_allows_any_origin() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .get(app.url("/health"))
        .header("Origin", "http://frontend.example")
        .send()
        .await?;

    assert!(response.status().is_success());
    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("CORS header should be present")
        .to_str()?;
    assert_eq!(allow_origin, "*");

    Ok(())
}

#[tokio::test]
async fn test_wrong_method_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;

    // `unsave-route` is a PUT endpoint.
    let response = app
        .client
        .get(app.url("/unsave-route/?route_id=abc"))
        .send()
        .await?;

    assert_eq!(405, response.status().as_u16());
    Ok(())
}

#[tokio::test]
async fn test_run_serves_on_the_given_listener() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("run.db");
    let config_path = dir.path().join("config.yml");
    std::fs::write(&config_path, format!("db_url: \"{}\"\n", db_path.display()))?;
    let config = transit_composite_server::config::get_config(config_path.to_str())?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = format!("http://{}", listener.local_addr()?);
    let server = tokio::spawn(transit_composite_server::run(listener, config));
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let response = reqwest::get(format!("{address}/health")).await?;
    assert_eq!("OK", response.text().await?);
    // `run` creates the database before serving.
    assert!(db_path.exists());

    server.abort();
    Ok(())
}
