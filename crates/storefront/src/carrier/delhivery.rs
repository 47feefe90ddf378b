//! Delhivery client.
//!
//! Every call carries `Authorization: Token <key>`. Manifesting takes a form body whose
//! `data` field is itself a JSON document, and several endpoints report failure inside a
//! 200 response, so each call inspects the body as well as the status.

use super::{endpoint, message_field, read_json, value_as_string, Carrier, CarrierError, ShipmentRequest};
use crate::carrier::status::map_carrier_status;
use crate::model::{
    CancelOutcome, CarrierKind, PaymentMode, Serviceability, ShipmentCreated, TrackingEvent,
    TrackingSnapshot, TrackingStatus, Waybill,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://track.delhivery.com";

#[derive(Clone)]
pub struct DelhiveryConfig {
    pub base_url: String,
    pub token: String,
    /// Registered warehouse name.
    pub pickup_location: String,
}

impl std::fmt::Debug for DelhiveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelhiveryConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("pickup_location", &self.pickup_location)
            .finish()
    }
}

pub struct DelhiveryClient {
    http: reqwest::Client,
    config: DelhiveryConfig,
}

#[derive(Deserialize)]
struct ManifestResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    packages: Vec<ManifestPackage>,
}

#[derive(Deserialize)]
struct ManifestPackage {
    status: Option<String>,
    waybill: Option<Value>,
    #[serde(default)]
    remarks: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShipmentEnvelope {
    shipment: PackageShipment,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PackageShipment {
    status: Option<PackageStatus>,
    #[serde(default)]
    scans: Vec<ScanEnvelope>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PackageStatus {
    status: Option<String>,
    status_location: Option<String>,
    status_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScanEnvelope {
    scan_detail: ScanDetail,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScanDetail {
    scan: Option<String>,
    scan_date_time: Option<String>,
    scanned_location: Option<String>,
}

impl DelhiveryClient {
    pub fn new(http: reqwest::Client, config: DelhiveryConfig) -> Self {
        Self { http, config }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.config.base_url, path)
    }

    fn auth(&self) -> String {
        format!("Token {}", self.config.token)
    }

    fn manifest_payload(&self, request: &ShipmentRequest) -> Value {
        let address = &request.address;
        json!({
            "shipments": [{
                "name": address.name,
                "add": request.street(),
                "pin": address.pincode,
                "city": address.city,
                "state": address.state,
                "country": address.country,
                "phone": address.phone,
                "order": request.order_ref,
                "payment_mode": match request.payment_mode {
                    PaymentMode::Cod => "COD",
                    PaymentMode::Prepaid => "Prepaid",
                },
                "products_desc": request.description(),
                "cod_amount": request.cod_amount(),
                "total_amount": request.total,
                "quantity": request.total_units(),
                "order_date": request.order_date.to_rfc3339(),
                "weight": request.package.weight_kg * 1000.0,
                "shipment_length": request.package.length_cm,
                "shipment_width": request.package.breadth_cm,
                "shipment_height": request.package.height_cm,
            }],
            "pickup_location": { "name": self.config.pickup_location },
        })
    }
}

#[async_trait]
impl Carrier for DelhiveryClient {
    fn kind(&self) -> CarrierKind {
        CarrierKind::Delhivery
    }

    #[instrument(skip(self, request), fields(order_ref = %request.order_ref, carrier = "delhivery"))]
    async fn create_shipment(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentCreated, CarrierError> {
        let data = self.manifest_payload(request).to_string();
        debug!(%data, "Manifesting Delhivery shipment");
        let response = self
            .http
            .post(self.url("api/cmu/create.json"))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .form(&[("format", "json"), ("data", data.as_str())])
            .send()
            .await?;
        let body = read_json(response).await?;

        let manifest: ManifestResponse = serde_json::from_value(body.clone())
            .map_err(|e| CarrierError::UnexpectedResponse(e.to_string()))?;
        let package = manifest.packages.into_iter().next();
        let accepted = package
            .as_ref()
            .map_or(false, |p| p.status.as_deref() == Some("Success"));
        if !manifest.success || !accepted {
            let message = package
                .as_ref()
                .and_then(|p| message_field(&json!({ "remarks": p.remarks })))
                .or_else(|| message_field(&body))
                .unwrap_or_else(|| "Delhivery did not accept the shipment".into());
            return Err(CarrierError::rejected_in_body(message));
        }

        let waybill = package
            .and_then(|p| p.waybill.as_ref().and_then(value_as_string))
            .ok_or_else(|| CarrierError::UnexpectedResponse("accepted package has no waybill".into()))?;

        info!(%waybill, "Delhivery shipment created");
        Ok(ShipmentCreated {
            carrier: CarrierKind::Delhivery,
            tracking_url: Some(format!("https://www.delhivery.com/track/package/{waybill}")),
            waybill: Waybill::new(waybill),
            carrier_shipment_id: None,
        })
    }

    #[instrument(skip(self), fields(carrier = "delhivery"))]
    async fn track_shipment(&self, waybill: &Waybill) -> Result<TrackingSnapshot, CarrierError> {
        let response = self
            .http
            .get(self.url("api/v1/packages/json/"))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .query(&[("waybill", waybill.as_str())])
            .send()
            .await?;
        let raw = read_json(response).await?;

        let Some(first) = raw["ShipmentData"].as_array().and_then(|data| data.first()) else {
            return Err(CarrierError::Rejected {
                status: 404,
                message: message_field(&raw)
                    .unwrap_or_else(|| format!("No tracking data for waybill {waybill}")),
            });
        };
        let envelope: ShipmentEnvelope = serde_json::from_value(first.clone())
            .map_err(|e| CarrierError::UnexpectedResponse(e.to_string()))?;
        let shipment = envelope.shipment;

        let status = shipment.status.as_ref();
        let carrier_status = status
            .and_then(|s| s.status.clone())
            .ok_or_else(|| CarrierError::UnexpectedResponse("shipment has no status".into()))?;
        // StatusType RT marks the return leg; "Delivered" there means back at the warehouse.
        let tracking_status = match status.and_then(|s| s.status_type.as_deref()) {
            Some("RT") => TrackingStatus::Failed,
            _ => map_carrier_status(&carrier_status),
        };

        let events = shipment
            .scans
            .iter()
            .map(|scan| TrackingEvent {
                status: scan.scan_detail.scan.clone().unwrap_or_default(),
                location: scan.scan_detail.scanned_location.clone(),
                timestamp: scan.scan_detail.scan_date_time.clone(),
            })
            .collect();

        Ok(TrackingSnapshot {
            waybill: waybill.clone(),
            location: status.and_then(|s| s.status_location.clone()),
            carrier_status,
            tracking_status,
            events,
            raw,
        })
    }

    #[instrument(skip(self), fields(carrier = "delhivery"))]
    async fn cancel_shipment(&self, waybill: &Waybill) -> Result<CancelOutcome, CarrierError> {
        let response = self
            .http
            .post(self.url("api/p/edit"))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(&json!({ "waybill": waybill.as_str(), "cancellation": "true" }))
            .send()
            .await?;
        let body = read_json(response).await?;

        let message = message_field(&body).unwrap_or_default();
        if body["status"].as_bool() != Some(true) {
            return Err(CarrierError::rejected_in_body(if message.is_empty() {
                format!("Delhivery refused to cancel {waybill}")
            } else {
                message
            }));
        }

        info!(%message, "Delhivery cancellation accepted");
        Ok(CancelOutcome {
            success: true,
            message,
        })
    }

    #[instrument(skip(self), fields(carrier = "delhivery"))]
    async fn check_serviceability(&self, pincode: &str) -> Result<Serviceability, CarrierError> {
        let response = self
            .http
            .get(self.url("c/api/pin-codes/json/"))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .query(&[("filter_codes", pincode)])
            .send()
            .await?;
        let body = read_json(response).await?;

        let Some(postal) = body["delivery_codes"]
            .as_array()
            .and_then(|codes| codes.first())
            .map(|code| &code["postal_code"])
        else {
            return Ok(Serviceability::unserviceable(pincode));
        };

        let flag = |key: &str| postal[key].as_str() == Some("Y");
        let cod = flag("cod");
        let prepaid = flag("pre_paid");
        Ok(Serviceability {
            pincode: pincode.to_string(),
            serviceable: cod || prepaid,
            cod,
            prepaid,
            estimated_days: None,
        })
    }
}
