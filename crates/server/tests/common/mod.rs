//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the
//! `transit-composite-server` integration tests:
//!
//! - `TestApp`: spawns a real server on a random port with a temporary SQLite
//!   database and every downstream service pointed at one `httpmock::MockServer`.
//! - `generate_jwt`: signs bearer tokens with the app's secret.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::Client;
use std::{
    fs::File,
    io::Write,
    net::SocketAddr,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};
use transit_composite_server::{
    auth::middleware::Claims,
    config, router,
    state::{build_app_state, AppState},
};

/// Where each downstream service lives on the mock server.
pub const MAPS_PREFIX: &str = "/maps";
pub const EQUIPMENT_PREFIX: &str = "/equipment";
pub const EMAIL_PATH: &str = "/email_notification";

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub db_path: PathBuf,
    pub app_state: AppState,
    _db_dir: TempDir,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with authentication disabled.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_auth(false).await
    }

    /// Spawns the application server, with bearer-token auth on or off.
    pub async fn spawn_with_auth(auth_enabled: bool) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let db_dir = tempdir()?;
        let db_path = db_dir.path().join("transit.db");

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
jwt_secret: "test-secret"
auth:
  enabled: {auth_enabled}
services:
  maps:
    api_url: "{}"
    timeout_secs: 5
  equipment:
    api_url: "{}"
    timeout_secs: 5
  email:
    api_url: "{}"
    timeout_secs: 5
"#,
            db_path.display(),
            mock_server.url(MAPS_PREFIX),
            mock_server.url(EQUIPMENT_PREFIX),
            mock_server.url(EMAIL_PATH),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config_path = config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Temp config path is not UTF-8"))?;
        let config = config::get_config(Some(config_path))?;
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            db_path,
            app_state: app_state_for_harness,
            _db_dir: db_dir,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Builds an absolute URL for `path` on the running server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Counts rows of `table` for `route_id` in the server's database.
    pub async fn count_rows_for_route(&self, table: &str, route_id: &str) -> Result<i64> {
        transit_test_utils::count_rows_for_route(&self.app_state.db, table, route_id).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// --- JWT Helpers ---

/// Signs a token for `sub` that expires one hour from now.
pub fn generate_jwt(sub: &str, secret: &str) -> Result<String> {
    let exp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() + 3600;
    generate_jwt_with_expiry(sub, secret, exp as usize)
}

/// Signs a token for `sub` with an explicit `exp` timestamp.
pub fn generate_jwt_with_expiry(sub: &str, secret: &str, exp: usize) -> Result<String> {
    let claims = Claims {
        sub: sub.to_string(),
        exp,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}
