//! Custom actions for the Order actor.
//!
//! These are the only ways the shipment fields of an [`Order`] change. The admin edit
//! ([`OrderUpdate`](crate::model::OrderUpdate)) cannot touch them.

use crate::model::{Order, ShipmentCreated, TrackingSnapshot};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Store the carrier's answer to a shipment booking.
    ///
    /// # Errors
    /// Fails if the order already has a tracking number or is terminal.
    RecordShipment(ShipmentCreated),
    /// Store a tracking lookup.
    ///
    /// # Errors
    /// Fails if the order has no shipment or the waybill does not match.
    ApplyTracking(TrackingSnapshot),
    /// The carrier accepted a cancellation.
    MarkShipmentCancelled,
}

/// Results from OrderActions - variants match 1:1 with OrderAction.
/// Every action answers with the order as stored afterwards.
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    RecordShipment(Order),
    ApplyTracking(Order),
    MarkShipmentCancelled(Order),
}

impl OrderActionResult {
    pub fn into_order(self) -> Order {
        match self {
            OrderActionResult::RecordShipment(order)
            | OrderActionResult::ApplyTracking(order)
            | OrderActionResult::MarkShipmentCancelled(order) => order,
        }
    }
}
