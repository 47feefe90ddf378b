//! Error types for the Order actor.

use crate::model::{OrderStatus, Waybill};
use resource_actor::FrameworkError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The placement or edit payload was rejected.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// The requested status change leaves a terminal status.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A shipment is already booked for this order.
    #[error("Shipment already created with waybill {0}")]
    ShipmentAlreadyCreated(Waybill),

    /// The operation needs a shipment and the order has none.
    #[error("Order {0} has no shipment")]
    NoShipment(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        if let Some(order_error) = err.entity_error::<OrderError>() {
            return order_error.clone();
        }
        match err {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
