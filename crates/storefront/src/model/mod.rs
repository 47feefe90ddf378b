//! # Domain Model
//!
//! Pure data: the order record the store owns, its payloads, and the shipment types that
//! travel between the carrier clients and the order store.
//!
//! - [`order`]: [`Order`], [`OrderCreate`], [`OrderUpdate`], [`OrderFilter`] and the
//!   status enums.
//! - [`shipment`]: [`Waybill`], [`Shipment`], [`ShipmentCreated`], [`TrackingSnapshot`]
//!   and the other carrier-facing values.
//!
//! The [`ActorEntity`](resource_actor::ActorEntity) implementation lives with the actor
//! in [`crate::order_actor`].

pub mod order;
pub mod shipment;

pub use order::*;
pub use shipment::*;
