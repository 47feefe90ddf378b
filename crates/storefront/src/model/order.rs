/// Represents a customer order.
///
/// # Resource Actor
/// This struct implements the [`ActorEntity`](resource_actor::ActorEntity) trait,
/// allowing it to be owned by a [`ResourceActor`](resource_actor::ResourceActor).
///
/// See [`crate::order_actor`] for:
/// - Creation parameters ([`OrderCreate`]) and their validation
/// - Admin edits ([`OrderUpdate`]) and the terminal-state rule
/// - Shipment actions ([`OrderAction`](crate::order_actor::OrderAction))
use crate::model::{Shipment, Waybill};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
///
/// Serialized as the bare number, displayed as `order_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl OrderId {
    /// Parse a path segment. Both `7` and `order_7` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("order_").unwrap_or(raw);
        digits.parse().ok().map(Self)
    }
}

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Lifecycle of an order as seen by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// `Delivered` and `Cancelled` orders never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Staying put is always allowed; leaving a terminal status never is.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        *self == next || !self.is_terminal()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the parcel is, normalized across carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Pending,
    Picked,
    InTransit,
    Delivered,
    Failed,
}

impl Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TrackingStatus::Pending => "pending",
            TrackingStatus::Picked => "picked",
            TrackingStatus::InTransit => "in_transit",
            TrackingStatus::Delivered => "delivered",
            TrackingStatus::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    #[serde(rename = "COD")]
    Cod,
    Prepaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub mode: PaymentMode,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// Unit price in rupees.
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "India".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment: Payment,
    pub status: OrderStatus,
    /// Set once, when the carrier accepts the shipment.
    pub tracking_number: Option<Waybill>,
    pub tracking_status: TrackingStatus,
    pub shipment: Option<Shipment>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of `quantity * price` over all items.
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| f64::from(item.quantity) * item.price)
            .sum()
    }

    pub fn has_shipment(&self) -> bool {
        self.tracking_number.is_some()
    }
}

/// Payload for placing a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_mode: PaymentMode,
    /// Gateway reference of a completed prepaid payment, if any.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Client-generated token; stored as given.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Admin edit. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub transaction_id: Option<String>,
}

/// Criteria for listing orders. An empty filter lists everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub tracking_status: Option<TrackingStatus>,
    pub has_shipment: Option<bool>,
}

impl OrderFilter {
    /// Orders the tracking poller should refresh.
    pub fn awaiting_delivery() -> Self {
        Self {
            has_shipment: Some(true),
            ..Self::default()
        }
    }
}
