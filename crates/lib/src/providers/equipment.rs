use super::{send_with_retries, ServiceOptions};
use crate::{equipment::EquipmentSource, errors::TransitError};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Url};
use serde_json::Value;
use tracing::debug;

const SERVICE_NAME: &str = "equipment service";

/// An HTTP client for the transit-equipment-status service.
///
/// Status is served at `{api_url}/equipments/{station}`, with the station name
/// percent-encoded as a single path segment.
#[derive(Clone, Debug)]
pub struct EquipmentClient {
    client: ReqwestClient,
    options: ServiceOptions,
}

impl EquipmentClient {
    pub fn new(options: ServiceOptions) -> Result<Self, TransitError> {
        let client = options.build_client()?;
        Ok(Self { client, options })
    }

    fn station_url(&self, station: &str) -> Result<Url, TransitError> {
        let mut url = Url::parse(&self.options.api_url)
            .map_err(|_| TransitError::InvalidUrl(self.options.api_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| TransitError::InvalidUrl(self.options.api_url.clone()))?
            .pop_if_empty()
            .push("equipments")
            .push(station);
        Ok(url)
    }
}

#[async_trait]
impl EquipmentSource for EquipmentClient {
    async fn equipment_status(&self, station: &str) -> Result<Value, TransitError> {
        let url = self.station_url(station)?;
        debug!(%url, "--> Requesting equipment status");

        let response = send_with_retries(SERVICE_NAME, self.options.retries, || {
            self.client.get(url.clone())
        })
        .await
        .map_err(TransitError::EquipmentRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::EquipmentApi {
                station: station.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(TransitError::EquipmentRequest)
    }
}
