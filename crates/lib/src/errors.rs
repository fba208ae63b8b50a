use thiserror::Error;

/// Custom error types for the transit composite library.
#[derive(Error, Debug)]
pub enum TransitError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Invalid service URL '{0}'")]
    InvalidUrl(String),
    #[error("Failed to send request to mapping service: {0}")]
    MapsRequest(reqwest::Error),
    #[error("Mapping service returned an error ({status}): {body}")]
    MapsApi { status: u16, body: String },
    #[error("Mapping service response is malformed: {0}")]
    MapsMalformed(String),
    #[error("Failed to send request to equipment service: {0}")]
    EquipmentRequest(reqwest::Error),
    #[error("Equipment service returned an error ({status}) for '{station}': {body}")]
    EquipmentApi {
        station: String,
        status: u16,
        body: String,
    },
    #[error("Failed to send request to email function: {0}")]
    NotifierRequest(reqwest::Error),
    #[error("Email function returned an error ({status}): {body}")]
    NotifierApi { status: u16, body: String },
    #[error("Route {index} is malformed: {reason}")]
    MalformedRoute { index: usize, reason: String },
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransitError {
    /// Whether the error came from a downstream HTTP service or its payload.
    pub fn is_downstream(&self) -> bool {
        matches!(
            self,
            TransitError::MapsRequest(_)
                | TransitError::MapsApi { .. }
                | TransitError::MapsMalformed(_)
                | TransitError::EquipmentRequest(_)
                | TransitError::EquipmentApi { .. }
                | TransitError::NotifierRequest(_)
                | TransitError::NotifierApi { .. }
                | TransitError::MalformedRoute { .. }
        )
    }
}
