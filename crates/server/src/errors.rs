use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use transit_composite::TransitError;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from `transit-composite`.
    Transit(TransitError),
    /// A request that could not be extracted or failed validation.
    Rejected(StatusCode, String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `TransitError` to `AppError`.
impl From<TransitError> for AppError {
    fn from(err: TransitError) -> Self {
        AppError::Transit(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // A body that is not JSON at all is as unprocessable as one with the wrong shape.
        let status = match rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => rejection.status(),
        };
        AppError::Rejected(status, rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Transit(err) => {
                // Log the original error for debugging purposes
                error!("TransitError: {:?}", err);
                if err.is_downstream() {
                    (StatusCode::BAD_GATEWAY, err.to_string())
                } else {
                    match err {
                        TransitError::Database(e) => (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            format!("Database operation failed: {e}"),
                        ),
                        TransitError::Json(e) => (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            format!("Failed to (de)serialize stored data: {e}"),
                        ),
                        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
                    }
                }
            }
            AppError::Rejected(status, message) => (status, message),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
