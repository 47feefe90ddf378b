//! # Shipment Sync
//!
//! The admin actions that tie an order to its carrier shipment. Each one reads the order,
//! makes exactly one carrier call, and writes the outcome back through the order store:
//!
//! ```text
//! create_shipment   order ──▶ carrier.create_shipment ──▶ RecordShipment
//! refresh_tracking  order ──▶ carrier.track_shipment  ──▶ ApplyTracking
//! cancel_shipment   order ──▶ carrier.cancel_shipment ──▶ MarkShipmentCancelled
//! ```
//!
//! Failures are logged and returned; nothing is retried or rolled back. If the carrier
//! books a shipment and the store then refuses it, [`SyncError::Unrecorded`] carries the
//! waybill so the parcel can be reconciled by hand.
//!
//! [`poller::TrackingPoller`] runs `refresh_tracking` on a timer.

pub mod poller;

pub use poller::{PollReport, PollerHandle, TrackingPoller};

use crate::carrier::{Carrier, CarrierError, PackageDimensions, ShipmentRequest};
use crate::clients::OrderClient;
use crate::model::{CancelOutcome, Order, OrderId, OrderStatus, Waybill};
use crate::order_actor::OrderError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Carrier(#[from] CarrierError),

    /// The carrier booked the parcel but the order store did not record it.
    #[error("Shipment {waybill} was created at the carrier but not recorded on {order_id}: {source}")]
    Unrecorded {
        order_id: OrderId,
        waybill: Waybill,
        source: OrderError,
    },
}

#[derive(Clone)]
pub struct ShipmentSync {
    orders: OrderClient,
    carrier: Arc<dyn Carrier>,
    package: PackageDimensions,
}

impl ShipmentSync {
    pub fn new(orders: OrderClient, carrier: Arc<dyn Carrier>, package: PackageDimensions) -> Self {
        Self {
            orders,
            carrier,
            package,
        }
    }

    pub fn orders(&self) -> &OrderClient {
        &self.orders
    }

    pub fn carrier(&self) -> &Arc<dyn Carrier> {
        &self.carrier
    }

    /// Book a shipment for `order_id` and record its waybill.
    #[instrument(skip(self, order_id), fields(order_id = %order_id))]
    pub async fn create_shipment(&self, order_id: OrderId) -> Result<Order, SyncError> {
        let order = self.orders.fetch(order_id).await?;
        if let Some(waybill) = &order.tracking_number {
            return Err(OrderError::ShipmentAlreadyCreated(waybill.clone()).into());
        }
        if order.status.is_terminal() {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Shipped,
            }
            .into());
        }

        let request = ShipmentRequest::from_order(&order, self.package);
        let created = self.carrier.create_shipment(&request).await.map_err(|e| {
            warn!(error = %e, "Carrier refused the shipment");
            e
        })?;
        let waybill = created.waybill.clone();
        info!(%waybill, carrier = %self.carrier.kind(), "Carrier accepted the shipment");

        match self.orders.record_shipment(order_id, created).await {
            Ok(order) => Ok(order),
            Err(source) => {
                error!(
                    %waybill,
                    error = %source,
                    "Shipment created at the carrier but not recorded; reconcile manually"
                );
                Err(SyncError::Unrecorded {
                    order_id,
                    waybill,
                    source,
                })
            }
        }
    }

    /// Fetch the current carrier status and store it on the order.
    #[instrument(skip(self, order_id), fields(order_id = %order_id))]
    pub async fn refresh_tracking(&self, order_id: OrderId) -> Result<Order, SyncError> {
        let order = self.orders.fetch(order_id).await?;
        let waybill = order
            .tracking_number
            .ok_or_else(|| OrderError::NoShipment(order_id.to_string()))?;

        info!(%waybill, carrier = %self.carrier.kind(), "Fetching tracking");
        let snapshot = self.carrier.track_shipment(&waybill).await.map_err(|e| {
            warn!(%waybill, error = %e, "Tracking lookup failed");
            e
        })?;

        let order = self.orders.apply_tracking(order_id, snapshot).await?;
        info!(tracking_status = ?order.tracking_status, "Tracking refreshed");
        Ok(order)
    }

    /// Cancel the shipment at the carrier, then mark the order cancelled.
    ///
    /// A delivered order is refused before the carrier is called. A carrier refusal (for
    /// instance a second cancel of the same waybill) is returned with the carrier's
    /// message and the order is left as it was.
    #[instrument(skip(self, order_id), fields(order_id = %order_id))]
    pub async fn cancel_shipment(
        &self,
        order_id: OrderId,
    ) -> Result<(Order, CancelOutcome), SyncError> {
        let order = self.orders.fetch(order_id).await?;
        if !order.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            }
            .into());
        }
        let waybill = order
            .tracking_number
            .ok_or_else(|| OrderError::NoShipment(order_id.to_string()))?;

        let outcome = self.carrier.cancel_shipment(&waybill).await.map_err(|e| {
            warn!(%waybill, error = %e, "Carrier refused the cancellation");
            e
        })?;
        info!(%waybill, message = %outcome.message, "Carrier cancelled the shipment");

        let order = self.orders.mark_shipment_cancelled(order_id).await?;
        Ok((order, outcome))
    }
}
