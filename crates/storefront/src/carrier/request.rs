use crate::model::{Order, OrderItem, PaymentMode, ShippingAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parcel size sent with every booking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageDimensions {
    pub weight_kg: f64,
    pub length_cm: f64,
    pub breadth_cm: f64,
    pub height_cm: f64,
}

impl Default for PackageDimensions {
    fn default() -> Self {
        Self {
            weight_kg: 0.5,
            length_cm: 10.0,
            breadth_cm: 10.0,
            height_cm: 10.0,
        }
    }
}

/// Everything a carrier needs to book a shipment, taken from one order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRequest {
    /// Our reference, sent as the carrier's order number.
    pub order_ref: String,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub address: ShippingAddress,
    pub payment_mode: PaymentMode,
    pub total: f64,
    pub package: PackageDimensions,
}

impl ShipmentRequest {
    pub fn from_order(order: &Order, package: PackageDimensions) -> Self {
        Self {
            order_ref: order.id.to_string(),
            order_date: order.created_at,
            items: order.items.clone(),
            address: order.shipping_address.clone(),
            payment_mode: order.payment.mode,
            total: order.total(),
            package,
        }
    }

    /// Amount the courier collects at the door.
    pub fn cod_amount(&self) -> f64 {
        match self.payment_mode {
            PaymentMode::Cod => self.total,
            PaymentMode::Prepaid => 0.0,
        }
    }

    pub fn total_units(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn description(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} x{}", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Street lines joined for carriers that take a single address field.
    pub fn street(&self) -> String {
        match &self.address.line2 {
            Some(line2) if !line2.trim().is_empty() => format!("{}, {}", self.address.line1, line2),
            _ => self.address.line1.clone(),
        }
    }
}
