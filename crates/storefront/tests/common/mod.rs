#![allow(dead_code)]

use axum::Router;
use storefront::model::{
    CarrierKind, OrderCreate, OrderItem, PaymentMode, ShipmentCreated, ShippingAddress,
    TrackingSnapshot, Waybill,
};
use storefront::carrier::map_carrier_status;
use tokio::net::TcpListener;

pub fn placement() -> OrderCreate {
    placement_to("560001")
}

pub fn placement_to(pincode: &str) -> OrderCreate {
    OrderCreate {
        items: vec![
            OrderItem {
                name: "Shilajit Resin 20g".into(),
                quantity: 1,
                price: 1499.0,
            },
            OrderItem {
                name: "Shilajit Gummies".into(),
                quantity: 2,
                price: 699.0,
            },
        ],
        shipping_address: ShippingAddress {
            name: "Rohan Mehta".into(),
            phone: "9812345678".into(),
            email: Some("rohan@example.com".into()),
            line1: "221 Park Street".into(),
            line2: Some("Flat 4B".into()),
            city: "Kolkata".into(),
            state: "West Bengal".into(),
            pincode: pincode.into(),
            country: "India".into(),
        },
        payment_mode: PaymentMode::Cod,
        transaction_id: None,
        idempotency_key: Some("7f1c2a".into()),
    }
}

pub fn created(waybill: &str) -> ShipmentCreated {
    ShipmentCreated {
        carrier: CarrierKind::Shiprocket,
        waybill: Waybill::from(waybill),
        tracking_url: Some(format!("https://shiprocket.co/tracking/{waybill}")),
        carrier_shipment_id: Some("555".into()),
    }
}

/// A tracking lookup as the carrier client would build it.
pub fn snapshot(waybill: &str, carrier_status: &str) -> TrackingSnapshot {
    TrackingSnapshot {
        waybill: Waybill::from(waybill),
        carrier_status: carrier_status.into(),
        tracking_status: map_carrier_status(carrier_status),
        location: Some("Kolkata Hub".into()),
        events: vec![],
        raw: serde_json::json!({ "current_status": carrier_status }),
    }
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}
