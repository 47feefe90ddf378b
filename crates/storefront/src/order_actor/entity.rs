//! ActorEntity implementation for the Order domain type.
//!
//! Placement validation, the admin edit and the three shipment actions. Every hook runs
//! on a copy of the stored order, so an `Err` from any of them leaves the store as it was.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::model::{
    Order, OrderCreate, OrderFilter, OrderId, OrderItem, OrderStatus, OrderUpdate, Payment,
    PaymentMode, PaymentStatus, Shipment, ShipmentCreated, ShippingAddress, TrackingSnapshot,
    TrackingStatus,
};
use async_trait::async_trait;
use chrono::Utc;
use resource_actor::ActorEntity;
use tracing::debug;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Filter = OrderFilter;
    type Context = ();
    type Error = OrderError;

    /// Validates the payload and builds a new order.
    ///
    /// A prepaid order that arrives with a gateway transaction id is recorded as paid.
    /// Paid and COD orders start `Confirmed`; unpaid prepaid orders start `Pending`.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        validate_items(&params.items)?;
        validate_address(&params.shipping_address)?;

        let payment_status = match (params.payment_mode, &params.transaction_id) {
            (PaymentMode::Prepaid, Some(_)) => PaymentStatus::Paid,
            _ => PaymentStatus::Pending,
        };
        let status = match (params.payment_mode, payment_status) {
            (PaymentMode::Cod, _) | (_, PaymentStatus::Paid) => OrderStatus::Confirmed,
            _ => OrderStatus::Pending,
        };

        let now = Utc::now();
        Ok(Self {
            id,
            items: params.items,
            shipping_address: params.shipping_address,
            payment: Payment {
                mode: params.payment_mode,
                status: payment_status,
                transaction_id: params.transaction_id,
            },
            status,
            tracking_number: None,
            tracking_status: TrackingStatus::Pending,
            shipment: None,
            idempotency_key: params.idempotency_key,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an admin edit.
    ///
    /// # Errors
    /// `InvalidTransition` when the edit would move the order out of a terminal status.
    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), OrderError> {
        let mut changed = false;

        if let Some(next) = update.status {
            if !self.status.can_transition_to(next) {
                return Err(OrderError::InvalidTransition {
                    from: self.status,
                    to: next,
                });
            }
            changed |= self.status != next;
            self.status = next;
        }
        if let Some(payment_status) = update.payment_status {
            changed |= self.payment.status != payment_status;
            self.payment.status = payment_status;
        }
        if let Some(transaction_id) = update.transaction_id {
            changed |= self.payment.transaction_id.as_deref() != Some(transaction_id.as_str());
            self.payment.transaction_id = Some(transaction_id);
        }

        if changed {
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &(),
    ) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::RecordShipment(created) => {
                self.record_shipment(created)?;
                Ok(OrderActionResult::RecordShipment(self.clone()))
            }
            OrderAction::ApplyTracking(snapshot) => {
                self.apply_tracking(snapshot)?;
                Ok(OrderActionResult::ApplyTracking(self.clone()))
            }
            OrderAction::MarkShipmentCancelled => {
                self.mark_shipment_cancelled()?;
                Ok(OrderActionResult::MarkShipmentCancelled(self.clone()))
            }
        }
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.status.map_or(true, |status| status == self.status)
            && filter
                .tracking_status
                .map_or(true, |tracking| tracking == self.tracking_status)
            && filter
                .has_shipment
                .map_or(true, |wanted| wanted == self.has_shipment())
    }
}

impl Order {
    fn record_shipment(&mut self, created: ShipmentCreated) -> Result<(), OrderError> {
        if let Some(existing) = &self.tracking_number {
            return Err(OrderError::ShipmentAlreadyCreated(existing.clone()));
        }
        if self.status.is_terminal() {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Shipped,
            });
        }

        let now = Utc::now();
        self.tracking_number = Some(created.waybill.clone());
        self.shipment = Some(Shipment {
            carrier: created.carrier,
            waybill: created.waybill,
            tracking_url: created.tracking_url,
            carrier_shipment_id: created.carrier_shipment_id,
            carrier_status: None,
            last_location: None,
            created_at: now,
            last_synced_at: None,
        });
        self.status = OrderStatus::Shipped;
        self.tracking_status = TrackingStatus::Pending;
        self.updated_at = now;
        Ok(())
    }

    fn apply_tracking(&mut self, snapshot: TrackingSnapshot) -> Result<(), OrderError> {
        let id = self.id;
        let shipment = self
            .shipment
            .as_mut()
            .ok_or_else(|| OrderError::NoShipment(id.to_string()))?;
        if shipment.waybill != snapshot.waybill {
            return Err(OrderError::Validation(format!(
                "tracking for waybill {} does not belong to {id} (waybill {})",
                snapshot.waybill, shipment.waybill
            )));
        }

        let now = Utc::now();
        shipment.carrier_status = Some(snapshot.carrier_status);
        if snapshot.location.is_some() {
            shipment.last_location = snapshot.location;
        }
        shipment.last_synced_at = Some(now);

        self.tracking_status = snapshot.tracking_status;
        if snapshot.tracking_status == TrackingStatus::Delivered && !self.status.is_terminal() {
            debug!(order_id = %id, "Carrier reports delivery");
            self.status = OrderStatus::Delivered;
        }
        self.updated_at = now;
        Ok(())
    }

    fn mark_shipment_cancelled(&mut self) -> Result<(), OrderError> {
        if self.shipment.is_none() {
            return Err(OrderError::NoShipment(self.id.to_string()));
        }
        if !self.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Cancelled,
            });
        }
        self.status = OrderStatus::Cancelled;
        self.tracking_status = TrackingStatus::Failed;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::Validation(
            "an order needs at least one item".into(),
        ));
    }
    for item in items {
        if item.name.trim().is_empty() {
            return Err(OrderError::Validation("item name is empty".into()));
        }
        if item.quantity == 0 {
            return Err(OrderError::Validation(format!(
                "quantity of '{}' must be at least 1",
                item.name
            )));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(OrderError::Validation(format!(
                "price of '{}' must be a non-negative amount",
                item.name
            )));
        }
    }
    Ok(())
}

fn validate_address(address: &ShippingAddress) -> Result<(), OrderError> {
    let required = [
        ("name", &address.name),
        ("phone", &address.phone),
        ("line1", &address.line1),
        ("city", &address.city),
        ("state", &address.state),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(OrderError::Validation(format!(
            "shipping address {field} is empty"
        )));
    }
    if !is_pincode(&address.pincode) {
        return Err(OrderError::Validation(format!(
            "'{}' is not a six-digit pincode",
            address.pincode
        )));
    }
    Ok(())
}

/// Indian postal codes are exactly six digits.
pub fn is_pincode(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}
