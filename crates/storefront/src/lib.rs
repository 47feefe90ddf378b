//! # Storefront
//!
//! Order store, carrier integration and shipment tracking for the Shilajit shop.
//!
//! **Order placement → shipment creation at the carrier → tracking refresh (on demand or
//! every five minutes) → status fields updated on the order.**
//!
//! ## Core Components
//!
//! - **[model]**: [`Order`](model::Order) and the shipment values, pure data.
//! - **[order_actor]**: the order store, a [`ResourceActor`](resource_actor::ResourceActor)
//!   with the order rules and shipment actions.
//! - **[clients]**: [`OrderClient`](clients::OrderClient), the typed handle to the store.
//! - **[carrier]**: the [`Carrier`](carrier::Carrier) trait with Shiprocket and Delhivery
//!   clients.
//! - **[sync]**: [`ShipmentSync`](sync::ShipmentSync) admin actions and the
//!   [`TrackingPoller`](sync::TrackingPoller).
//! - **[api]**: axum routes.
//! - **[config]**: environment and secrets.
//! - **[lifecycle]**: [`StoreSystem`](lifecycle::StoreSystem), start and shutdown.
//!
//! ## Testing
//!
//! [`carrier::mock::MockCarrier`] stands in for the carrier;
//! [`resource_actor::mock::MockClient`] stands in for the store.

pub mod api;
pub mod carrier;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod sync;

#[cfg(test)]
mod test_support;
