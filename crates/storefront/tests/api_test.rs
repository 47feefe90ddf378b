//! The HTTP API end to end, with the real order actor behind a mock carrier.

mod common;

use common::{created, placement, placement_to, snapshot};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use storefront::api;
use storefront::carrier::mock::MockCarrier;
use storefront::carrier::{CarrierError, PackageDimensions};
use storefront::lifecycle::StoreSystem;
use storefront::model::{CancelOutcome, CarrierKind, Serviceability};

struct Harness {
    base: String,
    http: reqwest::Client,
    carrier: Arc<MockCarrier>,
}

impl Harness {
    async fn start() -> Self {
        let carrier = Arc::new(MockCarrier::new(CarrierKind::Shiprocket));
        let system = StoreSystem::with_carrier(carrier.clone(), PackageDimensions::default(), None);
        let base = common::serve(api::router(system.app_state())).await;
        Self {
            base,
            http: reqwest::Client::new(),
            carrier,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .http
            .patch(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn place(&self) -> u64 {
        let body = serde_json::to_value(placement()).unwrap();
        let (status, order) = self.post("/api/orders", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        order["id"].as_u64().unwrap()
    }
}

#[tokio::test]
async fn test_place_and_read_an_order() {
    let h = Harness::start().await;

    let body = serde_json::to_value(placement()).unwrap();
    let (status, order) = h.post("/api/orders", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["id"], 1);
    assert_eq!(order["status"], "confirmed");
    assert_eq!(order["trackingNumber"], Value::Null);
    assert_eq!(order["payment"]["mode"], "COD");
    assert_eq!(order["shippingAddress"]["country"], "India");

    let (status, by_number) = h.get("/api/orders/1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, by_ref) = h.get("/api/orders/order_1").await;
    assert_eq!(by_number, by_ref);
    assert_eq!(by_number, order);

    let (status, body) = h.get("/api/orders/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Order not found: order_99" }));

    let (status, _) = h.get("/api/orders/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_placements_are_400() {
    let h = Harness::start().await;

    let body = serde_json::to_value(placement_to("12AB45")).unwrap();
    let (status, body) = h.post("/api/orders", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pincode"));

    let (status, body) = h
        .post("/api/orders", Some(json!({ "items": "not a list" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_shipment_lifecycle_over_http() {
    let h = Harness::start().await;
    let id = h.place().await;

    h.carrier.expect_create().return_ok(created("SR42"));
    let (status, order) = h
        .post(&format!("/api/admin/orders/{id}/shipment"), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["trackingNumber"], "SR42");
    assert_eq!(order["status"], "shipped");

    // a second booking is refused without reaching the carrier
    let (status, body) = h
        .post(&format!("/api/admin/orders/{id}/shipment"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Shipment already created with waybill SR42");

    h.carrier
        .expect_track()
        .return_ok(snapshot("SR42", "OUT FOR DELIVERY"));
    let (status, order) = h
        .post(&format!("/api/admin/orders/{id}/tracking/refresh"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["trackingStatus"], "in_transit");

    let (status, view) = h.get(&format!("/api/orders/order_{id}/tracking")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["trackingNumber"], "SR42");
    assert_eq!(view["carrier"], "shiprocket");
    assert_eq!(view["carrierStatus"], "OUT FOR DELIVERY");
    assert_eq!(view["lastLocation"], "Kolkata Hub");
    assert_eq!(view["trackingUrl"], "https://shiprocket.co/tracking/SR42");

    h.carrier.expect_cancel().return_ok(CancelOutcome {
        success: true,
        message: "Shipment cancelled".into(),
    });
    let (status, body) = h
        .post(&format!("/api/admin/orders/{id}/shipment/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "cancelled");
    assert_eq!(body["cancellation"]["message"], "Shipment cancelled");

    h.carrier.expect_cancel().return_err(CarrierError::Rejected {
        status: 400,
        message: "Cannot cancel order in CANCELED status.".into(),
    });
    let (status, body) = h
        .post(&format!("/api/admin/orders/{id}/shipment/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Cannot cancel order in CANCELED status.");

    h.carrier.verify();
}

#[tokio::test]
async fn test_admin_listing_and_edits() {
    let h = Harness::start().await;
    let first = h.place().await;
    h.place().await;

    let (status, order) = h
        .patch(
            &format!("/api/admin/orders/{first}"),
            json!({ "status": "cancelled" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "cancelled");

    let (status, cancelled) = h.get("/api/admin/orders?status=cancelled").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled.as_array().unwrap().len(), 1);
    assert_eq!(cancelled[0]["id"], first);

    let (_, all) = h.get("/api/admin/orders").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, body) = h
        .patch(
            &format!("/api/admin/orders/{first}"),
            json!({ "status": "confirmed" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Cannot move order from cancelled to confirmed");

    let (status, _) = h.get("/api/admin/orders?status=lost").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_serviceability_and_health() {
    let h = Harness::start().await;

    let (status, _) = h.get("/api/shipping/serviceability/5600").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    h.carrier.expect_serviceability().return_ok(Serviceability {
        pincode: "560001".into(),
        serviceable: true,
        cod: true,
        prepaid: true,
        estimated_days: Some(3),
    });
    let (status, body) = h.get("/api/shipping/serviceability/560001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceable"], true);
    assert_eq!(body["estimatedDays"], 3);

    let health = h.http.get(h.url("/health")).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");

    h.carrier.verify();
}

#[tokio::test]
async fn test_store_system_shuts_down_cleanly() {
    let carrier = Arc::new(MockCarrier::new(CarrierKind::Delhivery));
    let system = StoreSystem::with_carrier(
        carrier,
        PackageDimensions::default(),
        Some(Duration::from_secs(60)),
    );
    assert!(system.has_poller());
    let id = system.orders.place_order(placement()).await.unwrap();
    assert_eq!(system.orders.fetch(id).await.unwrap().id, id);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_zero_poll_interval_disables_the_poller() {
    let carrier = Arc::new(MockCarrier::new(CarrierKind::Shiprocket));
    let system = StoreSystem::with_carrier(
        carrier.clone(),
        PackageDimensions::default(),
        Some(Duration::ZERO),
    );
    assert!(!system.has_poller());

    let id = system.orders.place_order(placement()).await.unwrap();
    assert_eq!(system.orders.fetch(id).await.unwrap().id, id);
    system.shutdown().await.unwrap();
    assert!(carrier.calls().is_empty());
}
