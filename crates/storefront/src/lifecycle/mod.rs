//! # System Lifecycle & Orchestration
//!
//! Starts the storefront's moving parts in dependency order and stops them in reverse.
//!
//! ```text
//! Config ──▶ carrier client ─┐
//!                            ├──▶ ShipmentSync ──▶ TrackingPoller (optional)
//! order actor ──▶ OrderClient┘          │
//!                                       └──▶ AppState ──▶ axum router
//! ```
//!
//! ## Graceful shutdown
//!
//! 1. The HTTP server stops accepting requests and drops the router (and its state).
//! 2. [`StoreSystem::shutdown`] stops the poller, which releases its `ShipmentSync`.
//! 3. The last `OrderClient` is dropped, the order actor's channel closes, the actor
//!    logs its final size and exits.
//!
//! Anything still holding an `OrderClient` keeps the order actor alive, so step 3 waits
//! for every clone to be gone.

pub mod store_system;

pub use store_system::StoreSystem;
