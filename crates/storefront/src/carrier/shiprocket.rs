//! Shiprocket client.
//!
//! Shiprocket issues a bearer token from `auth/login`. The token is cached for the life
//! of the client and fetched again once when a call comes back 401.
//!
//! Booking is two calls: `orders/create/adhoc` registers the order and returns a
//! `shipment_id`, then `courier/assign/awb` picks a courier and returns the AWB.

use super::{
    endpoint, message_field, read_json, value_as_string, Carrier, CarrierError, ShipmentRequest,
};
use crate::carrier::status::map_carrier_status;
use crate::model::{
    CancelOutcome, CarrierKind, PaymentMode, Serviceability, ShipmentCreated, TrackingEvent,
    TrackingSnapshot, Waybill,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://apiv2.shiprocket.in/v1/external";

#[derive(Clone)]
pub struct ShiprocketConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
    /// Pickup location nickname as registered in the Shiprocket panel.
    pub pickup_location: String,
    /// Warehouse pincode, used for serviceability checks.
    pub pickup_pincode: String,
}

impl std::fmt::Debug for ShiprocketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiprocketConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("pickup_location", &self.pickup_location)
            .field("pickup_pincode", &self.pickup_pincode)
            .finish()
    }
}

pub struct ShiprocketClient {
    http: reqwest::Client,
    config: ShiprocketConfig,
    token: RwLock<Option<String>>,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Deserialize)]
struct TrackingData {
    shipment_track: Option<Vec<ShipmentTrack>>,
    shipment_track_activities: Option<Vec<TrackActivity>>,
    track_url: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ShipmentTrack {
    current_status: Option<String>,
    destination: Option<String>,
}

#[derive(Deserialize)]
struct TrackActivity {
    date: Option<String>,
    activity: Option<String>,
    status: Option<String>,
    location: Option<String>,
}

impl ShiprocketClient {
    pub fn new(http: reqwest::Client, config: ShiprocketConfig) -> Self {
        Self {
            http,
            config,
            token: RwLock::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.config.base_url, path)
    }

    async fn login(&self) -> Result<String, CarrierError> {
        debug!("Logging in to Shiprocket");
        let response = self
            .http
            .post(self.url("auth/login"))
            .json(&json!({
                "email": self.config.email,
                "password": self.config.password,
            }))
            .send()
            .await?;

        let body = read_json(response).await.map_err(|e| match e {
            CarrierError::Rejected { message, .. } => CarrierError::Auth(message),
            other => other,
        })?;
        let login: LoginResponse = serde_json::from_value(body)
            .map_err(|e| CarrierError::UnexpectedResponse(e.to_string()))?;
        let token = login
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| CarrierError::Auth("login response carried no token".into()))?;

        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    async fn token(&self) -> Result<String, CarrierError> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }
        self.login().await
    }

    /// Send an authenticated request built by `build`, logging in again once on 401.
    async fn send(
        &self,
        build: impl Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    ) -> Result<Value, CarrierError> {
        let token = self.token().await?;
        let response = build(&self.http).bearer_auth(&token).send().await?;
        if response.status() != reqwest::StatusCode::UNAUTHORIZED {
            return read_json(response).await;
        }

        warn!("Shiprocket token rejected, logging in again");
        *self.token.write().await = None;
        let token = self.login().await?;
        let response = build(&self.http).bearer_auth(&token).send().await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CarrierError::Auth("token rejected after fresh login".into()));
        }
        read_json(response).await
    }

    fn order_payload(&self, request: &ShipmentRequest) -> Value {
        let address = &request.address;
        let (first_name, last_name) = match address.name.trim().split_once(' ') {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (address.name.trim().to_string(), String::new()),
        };
        let items: Vec<Value> = request
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                json!({
                    "name": item.name,
                    "sku": format!("{}-{}", request.order_ref, index + 1),
                    "units": item.quantity,
                    "selling_price": item.price,
                })
            })
            .collect();

        json!({
            "order_id": request.order_ref,
            "order_date": request.order_date.format("%Y-%m-%d %H:%M").to_string(),
            "pickup_location": self.config.pickup_location,
            "billing_customer_name": first_name,
            "billing_last_name": last_name,
            "billing_address": address.line1,
            "billing_address_2": address.line2.clone().unwrap_or_default(),
            "billing_city": address.city,
            "billing_pincode": address.pincode,
            "billing_state": address.state,
            "billing_country": address.country,
            "billing_email": address.email.clone().unwrap_or_default(),
            "billing_phone": address.phone,
            "shipping_is_billing": true,
            "order_items": items,
            "payment_method": match request.payment_mode {
                PaymentMode::Cod => "COD",
                PaymentMode::Prepaid => "Prepaid",
            },
            "sub_total": request.total,
            "length": request.package.length_cm,
            "breadth": request.package.breadth_cm,
            "height": request.package.height_cm,
            "weight": request.package.weight_kg,
        })
    }
}

#[async_trait]
impl Carrier for ShiprocketClient {
    fn kind(&self) -> CarrierKind {
        CarrierKind::Shiprocket
    }

    #[instrument(skip(self, request), fields(order_ref = %request.order_ref, carrier = "shiprocket"))]
    async fn create_shipment(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentCreated, CarrierError> {
        let payload = self.order_payload(request);
        debug!(?payload, "Creating Shiprocket order");
        let url = self.url("orders/create/adhoc");
        let created = self.send(|http| http.post(&url).json(&payload)).await?;

        let shipment_id = created
            .get("shipment_id")
            .and_then(value_as_string)
            .ok_or_else(|| {
                CarrierError::rejected_in_body(
                    message_field(&created).unwrap_or_else(|| "order was not created".into()),
                )
            })?;

        let url = self.url("courier/assign/awb");
        let body = json!({ "shipment_id": shipment_id });
        let assigned = self.send(|http| http.post(&url).json(&body)).await?;

        let data = &assigned["response"]["data"];
        let awb = data.get("awb_code").and_then(value_as_string);
        let awb = match (assigned["awb_assign_status"].as_i64(), awb) {
            (Some(1), Some(awb)) => awb,
            _ => {
                let message = data
                    .get("awb_assign_error")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .or_else(|| message_field(&assigned))
                    .unwrap_or_else(|| "AWB could not be assigned".into());
                return Err(CarrierError::rejected_in_body(message));
            }
        };

        info!(waybill = %awb, shipment_id = %shipment_id, "Shiprocket shipment created");
        Ok(ShipmentCreated {
            carrier: CarrierKind::Shiprocket,
            tracking_url: Some(format!("https://shiprocket.co/tracking/{awb}")),
            waybill: Waybill::new(awb),
            carrier_shipment_id: Some(shipment_id),
        })
    }

    #[instrument(skip(self), fields(carrier = "shiprocket"))]
    async fn track_shipment(&self, waybill: &Waybill) -> Result<TrackingSnapshot, CarrierError> {
        let url = self.url(&format!("courier/track/awb/{}", waybill.as_str()));
        let raw = self.send(|http| http.get(&url)).await?;

        // Single lookups answer `{tracking_data}`, some accounts get `{<awb>: {tracking_data}}`.
        let tracking = raw
            .get("tracking_data")
            .or_else(|| raw.get(waybill.as_str()).and_then(|v| v.get("tracking_data")))
            .cloned()
            .ok_or_else(|| CarrierError::UnexpectedResponse("no tracking_data in response".into()))?;
        let tracking: TrackingData = serde_json::from_value(tracking)
            .map_err(|e| CarrierError::UnexpectedResponse(e.to_string()))?;

        if let Some(error) = tracking.error.filter(|e| !e.is_empty()) {
            return Err(CarrierError::Rejected {
                status: 404,
                message: error,
            });
        }

        let activities = tracking.shipment_track_activities.unwrap_or_default();
        let tracks = tracking.shipment_track.unwrap_or_default();
        let current = tracks.first();
        let carrier_status = current
            .and_then(|track| track.current_status.clone())
            .or_else(|| activities.first().and_then(|a| a.activity.clone()))
            .ok_or_else(|| CarrierError::Rejected {
                status: 404,
                message: format!("No tracking data for AWB {waybill}"),
            })?;
        let location = activities
            .first()
            .and_then(|a| a.location.clone())
            .or_else(|| current.and_then(|track| track.destination.clone()));

        let events = activities
            .iter()
            .map(|activity| TrackingEvent {
                status: activity
                    .activity
                    .clone()
                    .or_else(|| activity.status.clone())
                    .unwrap_or_default(),
                location: activity.location.clone(),
                timestamp: activity.date.clone(),
            })
            .collect();

        debug!(%carrier_status, track_url = ?tracking.track_url, "Shiprocket tracking fetched");
        Ok(TrackingSnapshot {
            waybill: waybill.clone(),
            tracking_status: map_carrier_status(&carrier_status),
            carrier_status,
            location,
            events,
            raw,
        })
    }

    #[instrument(skip(self), fields(carrier = "shiprocket"))]
    async fn cancel_shipment(&self, waybill: &Waybill) -> Result<CancelOutcome, CarrierError> {
        let url = self.url("orders/cancel/shipment/awbs");
        let body = json!({ "awbs": [waybill.as_str()] });
        let response = self.send(|http| http.post(&url).json(&body)).await?;

        let message = message_field(&response).unwrap_or_else(|| "Shipment cancelled".into());
        info!(%message, "Shiprocket cancellation accepted");
        Ok(CancelOutcome {
            success: true,
            message,
        })
    }

    #[instrument(skip(self), fields(carrier = "shiprocket"))]
    async fn check_serviceability(&self, pincode: &str) -> Result<Serviceability, CarrierError> {
        let url = self.url("courier/serviceability/");
        let query = [
            ("pickup_postcode", self.config.pickup_pincode.as_str()),
            ("delivery_postcode", pincode),
            ("cod", "1"),
            ("weight", "0.5"),
        ];
        let response = match self.send(|http| http.get(&url).query(&query)).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(Serviceability::unserviceable(pincode)),
            Err(e) => return Err(e),
        };

        let couriers = response["data"]["available_courier_companies"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        if couriers.is_empty() {
            return Ok(Serviceability::unserviceable(pincode));
        }

        let cod = couriers.iter().any(|courier| courier["cod"].as_i64() == Some(1));
        let estimated_days = couriers
            .iter()
            .filter_map(|courier| {
                value_as_string(&courier["estimated_delivery_days"])?
                    .parse::<u32>()
                    .ok()
            })
            .min();

        Ok(Serviceability {
            pincode: pincode.to_string(),
            serviceable: true,
            cod,
            prepaid: true,
            estimated_days,
        })
    }
}
