//! # Application Configuration
//!
//! This module defines the configuration structure for the
//! `transit-composite-server` and the logic for loading it from an optional
//! `config.yml` file and environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;
use transit_composite::providers::ServiceOptions;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// The HS256 secret bearer tokens are signed with. Loaded from `JWT_SECRET` env var.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Bearer-token validation settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Addresses and client options of the downstream services.
    pub services: ServicesConfig,
}

/// Settings for the bearer-token middleware.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Paths served without a token even when `enabled` is set.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            public_paths: default_public_paths(),
        }
    }
}

/// The downstream services this server composes.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    /// The mapping service that answers route queries.
    pub maps: ServiceOptions,
    /// The transit-equipment-status service.
    pub equipment: ServiceOptions,
    /// The serverless email function.
    pub email: ServiceOptions,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    5001
}

/// Provides a default value for the `db_url` field if not set in the environment.
fn default_db_url() -> String {
    "db/transit.db".to_string()
}

fn default_jwt_secret() -> String {
    "a-secure-secret-key".to_string()
}

fn default_public_paths() -> Vec<String> {
    vec!["/".to_string(), "/health".to_string()]
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from defaults, a file and environment variables.
///
/// Layers, lowest priority first:
/// - Built-in defaults, including localhost addresses for every service.
/// - The YAML file at `config_path_override`, or `config.yml` next to this
///   crate's manifest if present. `${VAR}` placeholders are substituted.
/// - Top-level keys from the environment (`PORT`, `DB_URL`, `JWT_SECRET`).
/// - Nested keys from `TRANSIT_` variables, e.g. `TRANSIT_SERVICES__MAPS__API_URL`.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("services.maps.api_url", "http://localhost:5000")?
        .set_default("services.equipment.api_url", "http://localhost:5002")?
        .set_default("services.email.api_url", "http://localhost:8080")?;

    // Layer 2: Config file. An explicit path must exist; the default one is optional.
    let config_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            let content = read_and_substitute(&user_config_path)?;
            if content.is_some() {
                info!("Loading user-defined configuration from '{user_config_path}'.");
            }
            content
        }
    };
    if let Some(content) = config_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("TRANSIT")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.public_paths"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
