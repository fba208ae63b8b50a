//! # Notification Dispatcher
//!
//! Sends "route saved" emails through the serverless email function. The
//! function itself owns SMTP delivery; this client only posts the request.

use super::{send_with_retries, ServiceOptions};
use crate::{errors::TransitError, types::SavedRoute};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// The `email_response` reported when the caller gave no address.
pub const NO_EMAIL_PROVIDED: &str = "No user email is provided.";

const SERVICE_NAME: &str = "email function";
const SAVED_ROUTE_SUBJECT: &str = "Your route has been saved";

/// The email function answers `{"status": "..."}` on success.
#[derive(Deserialize)]
struct EmailStatus {
    status: String,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    to_email: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// A client for the email-sending function.
#[derive(Clone, Debug)]
pub struct NotificationClient {
    client: ReqwestClient,
    options: ServiceOptions,
}

impl NotificationClient {
    pub fn new(options: ServiceOptions) -> Result<Self, TransitError> {
        let client = options.build_client()?;
        Ok(Self { client, options })
    }

    /// Posts one email request and returns the function's status text.
    ///
    /// A JSON `{"status": ...}` body is reduced to its `status`; any other
    /// body is returned as-is.
    pub async fn send(
        &self,
        to_email: &str,
        subject: &str,
        message: &str,
    ) -> Result<String, TransitError> {
        let request = EmailRequest {
            to_email,
            subject,
            message,
        };

        let response = send_with_retries(SERVICE_NAME, self.options.retries, || {
            self.client.post(&self.options.api_url).json(&request)
        })
        .await
        .map_err(TransitError::NotifierRequest)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(TransitError::NotifierApi {
                status: status.as_u16(),
                body,
            });
        }
        Ok(status_text(body))
    }

    /// Tells the user about a freshly saved route.
    ///
    /// Never fails: a missing address or a failed send is reported in the
    /// returned text, which callers surface as `email_response`.
    pub async fn notify_saved_route(&self, to_email: Option<&str>, saved: &SavedRoute) -> String {
        let Some(to_email) = to_email.map(str::trim).filter(|e| !e.is_empty()) else {
            info!(route_id = %saved.route_id, "No email address given; skipping notification.");
            return NO_EMAIL_PROVIDED.to_string();
        };

        let message = format!(
            "Your route from {} to {} has been saved (route id: {}).",
            saved.source, saved.destination, saved.route_id
        );
        match self.send(to_email, SAVED_ROUTE_SUBJECT, &message).await {
            Ok(body) => {
                info!(route_id = %saved.route_id, "Saved-route email dispatched.");
                body
            }
            Err(e) => {
                error!(route_id = %saved.route_id, "Failed to send saved-route email: {e}");
                format!("Failed to send email: {e}")
            }
        }
    }
}

fn status_text(body: String) -> String {
    match serde_json::from_str::<EmailStatus>(&body) {
        Ok(parsed) => parsed.status,
        Err(_) => body,
    }
}
