//! # HTTP API
//!
//! The JSON endpoints the storefront and its admin panel call.
//!
//! | method | path | handler |
//! |---|---|---|
//! | POST | `/api/orders` | [`handlers::place_order`] |
//! | GET | `/api/orders/{id}` | [`handlers::get_order`] |
//! | GET | `/api/orders/{id}/tracking` | [`handlers::get_tracking`] |
//! | GET | `/api/admin/orders` | [`handlers::list_orders`] |
//! | PATCH | `/api/admin/orders/{id}` | [`handlers::update_order`] |
//! | POST | `/api/admin/orders/{id}/shipment` | [`handlers::create_shipment`] |
//! | POST | `/api/admin/orders/{id}/shipment/cancel` | [`handlers::cancel_shipment`] |
//! | POST | `/api/admin/orders/{id}/tracking/refresh` | [`handlers::refresh_tracking`] |
//! | GET | `/api/shipping/serviceability/{pincode}` | [`handlers::check_serviceability`] |
//! | GET | `/health` | [`handlers::health`] |
//!
//! `{id}` accepts `7` or `order_7`. Errors are `{"error": "<message>"}`; carrier
//! refusals come back as 502 with the carrier's message.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::AppError;
pub use state::AppState;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/orders", post(handlers::place_order))
        .route("/api/orders/{id}", get(handlers::get_order))
        .route("/api/orders/{id}/tracking", get(handlers::get_tracking))
        .route("/api/admin/orders", get(handlers::list_orders))
        .route(
            "/api/admin/orders/{id}",
            get(handlers::get_order).patch(handlers::update_order),
        )
        .route(
            "/api/admin/orders/{id}/shipment",
            post(handlers::create_shipment),
        )
        .route(
            "/api/admin/orders/{id}/shipment/cancel",
            post(handlers::cancel_shipment),
        )
        .route(
            "/api/admin/orders/{id}/tracking/refresh",
            post(handlers::refresh_tracking),
        )
        .route(
            "/api/shipping/serviceability/{pincode}",
            get(handlers::check_serviceability),
        )
        .layer(cors)
        .with_state(state)
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        info!("Server running on {address}");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
