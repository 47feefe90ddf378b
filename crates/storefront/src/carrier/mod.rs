//! # Carrier Clients
//!
//! The storefront books, tracks and cancels parcels with one external carrier. Both
//! supported carriers sit behind the [`Carrier`] trait, so the sync service and the HTTP
//! handlers never know which one is configured.
//!
//! | | [`ShiprocketClient`] | [`DelhiveryClient`] |
//! |---|---|---|
//! | **Auth** | email/password login, bearer token | static `Token` header |
//! | **Booking** | create order, then assign AWB | one manifest call |
//! | **Tracking** | `courier/track/awb/{awb}` | `api/v1/packages/json` |
//!
//! Every call is a single request: no retries, no backoff, no caching of tracking
//! results. When a carrier refuses, the error is [`CarrierError::Rejected`] and its
//! message is the carrier's text, unchanged.
//!
//! Tests use [`mock::MockCarrier`].

pub mod delhivery;
pub mod error;
pub mod mock;
pub mod request;
pub mod shiprocket;
pub mod status;

pub use delhivery::{DelhiveryClient, DelhiveryConfig};
pub use error::CarrierError;
pub use request::{PackageDimensions, ShipmentRequest};
pub use shiprocket::{ShiprocketClient, ShiprocketConfig};
pub use status::map_carrier_status;

use crate::model::{CancelOutcome, CarrierKind, Serviceability, ShipmentCreated, TrackingSnapshot, Waybill};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Carrier: Send + Sync {
    fn kind(&self) -> CarrierKind;

    /// Book a shipment and return its waybill.
    async fn create_shipment(&self, request: &ShipmentRequest)
        -> Result<ShipmentCreated, CarrierError>;

    /// Current status of a waybill, with the raw carrier payload.
    async fn track_shipment(&self, waybill: &Waybill) -> Result<TrackingSnapshot, CarrierError>;

    async fn cancel_shipment(&self, waybill: &Waybill) -> Result<CancelOutcome, CarrierError>;

    /// Whether the carrier delivers to `pincode`, and with which payment modes.
    async fn check_serviceability(&self, pincode: &str) -> Result<Serviceability, CarrierError>;
}

/// Carrier selection and credentials, as loaded by [`Config`](crate::config::Config).
#[derive(Debug, Clone)]
pub enum CarrierSettings {
    Shiprocket(ShiprocketConfig),
    Delhivery(DelhiveryConfig),
}

impl CarrierSettings {
    pub fn kind(&self) -> CarrierKind {
        match self {
            CarrierSettings::Shiprocket(_) => CarrierKind::Shiprocket,
            CarrierSettings::Delhivery(_) => CarrierKind::Delhivery,
        }
    }
}

/// Build the configured carrier client.
pub fn build_carrier(
    settings: &CarrierSettings,
    timeout: Duration,
) -> Result<Arc<dyn Carrier>, CarrierError> {
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(match settings {
        CarrierSettings::Shiprocket(config) => Arc::new(ShiprocketClient::new(http, config.clone())),
        CarrierSettings::Delhivery(config) => Arc::new(DelhiveryClient::new(http, config.clone())),
    })
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Read a response body as JSON. Non-2xx statuses become [`CarrierError::Rejected`]
/// carrying the carrier's message.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, CarrierError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(CarrierError::Rejected {
            status: status.as_u16(),
            message: carrier_message(&body).unwrap_or_else(|| status.to_string()),
        });
    }
    serde_json::from_str(&body)
        .map_err(|e| CarrierError::UnexpectedResponse(format!("{e} in body {}", preview(&body))))
}

/// The human-readable message in an error body, or the body itself.
pub(crate) fn carrier_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = message_field(&value) {
            return Some(message);
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn message_field(value: &Value) -> Option<String> {
    ["message", "error", "Error", "rmk", "remark", "remarks"]
        .iter()
        .find_map(|key| match value.get(key)? {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                (!joined.is_empty()).then_some(joined)
            }
            _ => None,
        })
}

/// Carriers send ids as numbers or strings depending on the endpoint.
pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
