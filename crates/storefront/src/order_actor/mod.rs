//! # Order Actor
//!
//! The order store: a [`ResourceActor<Order>`] plus the rules an order obeys.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](resource_actor::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`]
//! - [`actions`] - [`OrderAction`] and [`OrderActionResult`] for the shipment lifecycle
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Shipment actions
//!
//! ```rust,ignore
//! // After the carrier accepted the booking
//! orders.record_shipment(id, created).await?;
//!
//! // After a tracking lookup
//! orders.apply_tracking(id, snapshot).await?;
//!
//! // After the carrier accepted a cancellation
//! orders.mark_shipment_cancelled(id).await?;
//! ```
//!
//! ## Rules
//!
//! - An order needs at least one item and a six-digit pincode.
//! - `Delivered` and `Cancelled` are terminal.
//! - Only `RecordShipment` sets the tracking number, and only once.
//! - Orders are never deleted.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Order;
use resource_actor::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new() -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(32)
}
