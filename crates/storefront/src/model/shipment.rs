//! Shipment values exchanged between the carrier clients and the order store.
use crate::model::TrackingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Carrier-assigned tracking identifier (AWB).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Waybill(String);

impl Waybill {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Waybill {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for Waybill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierKind {
    Shiprocket,
    Delhivery,
}

impl Display for CarrierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CarrierKind::Shiprocket => "shiprocket",
            CarrierKind::Delhivery => "delhivery",
        })
    }
}

impl FromStr for CarrierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shiprocket" => Ok(CarrierKind::Shiprocket),
            "delhivery" => Ok(CarrierKind::Delhivery),
            other => Err(format!("unknown carrier '{other}'")),
        }
    }
}

/// The local mirror of a shipment booked with a carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub carrier: CarrierKind,
    pub waybill: Waybill,
    pub tracking_url: Option<String>,
    /// Carrier-side shipment reference, when it differs from the waybill.
    pub carrier_shipment_id: Option<String>,
    /// Last status string reported by the carrier, verbatim.
    pub carrier_status: Option<String>,
    pub last_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// What a carrier returns after accepting a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentCreated {
    pub carrier: CarrierKind,
    pub waybill: Waybill,
    pub tracking_url: Option<String>,
    pub carrier_shipment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub status: String,
    pub location: Option<String>,
    pub timestamp: Option<String>,
}

/// One tracking lookup: the extracted status plus the raw carrier payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSnapshot {
    pub waybill: Waybill,
    /// Current status string as the carrier reported it.
    pub carrier_status: String,
    pub tracking_status: TrackingStatus,
    pub location: Option<String>,
    pub events: Vec<TrackingEvent>,
    pub raw: serde_json::Value,
}

/// Result of a cancellation request, passed through from the carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Serviceability {
    pub pincode: String,
    pub serviceable: bool,
    pub cod: bool,
    pub prepaid: bool,
    pub estimated_days: Option<u32>,
}

impl Serviceability {
    pub fn unserviceable(pincode: &str) -> Self {
        Self {
            pincode: pincode.to_string(),
            serviceable: false,
            cod: false,
            prepaid: false,
            estimated_days: None,
        }
    }
}
