//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber. Call it once, from `main`.
//!
//! The output uses the compact format without targets: actors already tag every event
//! with `entity_type`, and the storefront adds `order_id`, `waybill` and `carrier`
//! fields to its spans.
//!
//! ```bash
//! # Request flow only
//! RUST_LOG=info cargo run -p storefront
//!
//! # Full payloads (create params, carrier responses)
//! RUST_LOG=debug cargo run -p storefront
//!
//! # Only the carrier clients
//! RUST_LOG=storefront::carrier=debug cargo run -p storefront
//! ```
//!
//! A shipment refresh at `info` looks like:
//!
//! ```text
//! INFO refresh_tracking{order_id=order_1}: Fetching tracking waybill="SR123" carrier=shiprocket
//! INFO refresh_tracking{order_id=order_1}: Action ok entity_type="Order" id=order_1
//! INFO refresh_tracking{order_id=order_1}: Tracking refreshed tracking_status=InTransit
//! ```
use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
