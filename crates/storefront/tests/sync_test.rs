mod common;

use common::{created, placement, snapshot};
use std::sync::Arc;
use std::time::Duration;
use storefront::carrier::mock::{CarrierCall, MockCarrier};
use storefront::carrier::{CarrierError, PackageDimensions};
use storefront::clients::OrderClient;
use storefront::model::{
    CancelOutcome, CarrierKind, OrderId, OrderStatus, PaymentMode, TrackingStatus, Waybill,
};
use storefront::order_actor::{self, OrderError};
use storefront::sync::{PollReport, ShipmentSync, SyncError, TrackingPoller};

fn setup() -> (ShipmentSync, Arc<MockCarrier>) {
    let (actor, generic) = order_actor::new();
    tokio::spawn(actor.run(()));
    let carrier = Arc::new(MockCarrier::new(CarrierKind::Shiprocket));
    let sync = ShipmentSync::new(
        OrderClient::new(generic),
        carrier.clone(),
        PackageDimensions::default(),
    );
    (sync, carrier)
}

async fn shipped_order(sync: &ShipmentSync, carrier: &MockCarrier, waybill: &str) -> OrderId {
    let id = sync.orders().place_order(placement()).await.unwrap();
    carrier.expect_create().return_ok(created(waybill));
    sync.create_shipment(id).await.unwrap();
    id
}

fn rejected(message: &str) -> CarrierError {
    CarrierError::Rejected {
        status: 422,
        message: message.into(),
    }
}

#[tokio::test]
async fn test_create_shipment_records_the_waybill() {
    let (sync, carrier) = setup();
    let id = sync.orders().place_order(placement()).await.unwrap();
    carrier.expect_create().return_ok(created("SR777"));

    let order = sync.create_shipment(id).await.unwrap();
    assert_eq!(order.tracking_number, Some(Waybill::from("SR777")));
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.tracking_status, TrackingStatus::Pending);

    let calls = carrier.calls();
    let CarrierCall::Create(request) = &calls[0] else {
        panic!("expected a create call, got {calls:?}");
    };
    assert_eq!(request.order_ref, "order_1");
    assert_eq!(request.payment_mode, PaymentMode::Cod);
    assert_eq!(request.cod_amount(), 2897.0);
    assert_eq!(request.address.pincode, "560001");
    carrier.verify();
}

#[tokio::test]
async fn test_carrier_refusal_leaves_the_order_unshipped() {
    let (sync, carrier) = setup();
    let id = sync.orders().place_order(placement()).await.unwrap();
    let before = sync.orders().fetch(id).await.unwrap();
    carrier
        .expect_create()
        .return_err(rejected("Oops! Invalid Data."));

    let err = sync.create_shipment(id).await.unwrap_err();
    assert!(matches!(err, SyncError::Carrier(_)));
    assert_eq!(err.to_string(), "Oops! Invalid Data.");
    assert_eq!(sync.orders().fetch(id).await.unwrap(), before);
    carrier.verify();
}

#[tokio::test]
async fn test_second_create_does_not_reach_the_carrier() {
    let (sync, carrier) = setup();
    let id = shipped_order(&sync, &carrier, "SR1").await;

    let err = sync.create_shipment(id).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Order(OrderError::ShipmentAlreadyCreated(ref w)) if w.as_str() == "SR1"
    ));
    assert_eq!(carrier.calls().len(), 1);
}

#[tokio::test]
async fn test_refresh_applies_the_carrier_status() {
    let (sync, carrier) = setup();
    let id = shipped_order(&sync, &carrier, "SR5").await;

    carrier.expect_track().return_ok(snapshot("SR5", "IN TRANSIT"));
    let order = sync.refresh_tracking(id).await.unwrap();
    assert_eq!(order.tracking_status, TrackingStatus::InTransit);
    assert_eq!(
        order.shipment.as_ref().unwrap().carrier_status.as_deref(),
        Some("IN TRANSIT")
    );

    carrier.expect_track().return_ok(snapshot("SR5", "DELIVERED"));
    let order = sync.refresh_tracking(id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(
        carrier.calls().last(),
        Some(&CarrierCall::Track(Waybill::from("SR5")))
    );
    carrier.verify();
}

#[tokio::test]
async fn test_unknown_waybill_is_surfaced_and_nothing_changes() {
    let (sync, carrier) = setup();
    let id = shipped_order(&sync, &carrier, "SR404").await;
    let before = sync.orders().fetch(id).await.unwrap();

    carrier.expect_track().return_err(CarrierError::Rejected {
        status: 404,
        message: "No such waybill or Order Id found".into(),
    });
    let err = sync.refresh_tracking(id).await.unwrap_err();
    assert_eq!(err.to_string(), "No such waybill or Order Id found");
    assert_eq!(sync.orders().fetch(id).await.unwrap(), before);
}

#[tokio::test]
async fn test_refresh_and_cancel_need_a_shipment() {
    let (sync, _carrier) = setup();
    let id = sync.orders().place_order(placement()).await.unwrap();

    assert!(matches!(
        sync.refresh_tracking(id).await.unwrap_err(),
        SyncError::Order(OrderError::NoShipment(_))
    ));
    assert!(matches!(
        sync.cancel_shipment(id).await.unwrap_err(),
        SyncError::Order(OrderError::NoShipment(_))
    ));
    assert!(matches!(
        sync.refresh_tracking(OrderId(99)).await.unwrap_err(),
        SyncError::Order(OrderError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_cancelling_twice_surfaces_the_carrier_message() {
    let (sync, carrier) = setup();
    let id = shipped_order(&sync, &carrier, "SR9").await;

    carrier.expect_cancel().return_ok(CancelOutcome {
        success: true,
        message: "Shipment cancelled".into(),
    });
    let (order, outcome) = sync.cancel_shipment(id).await.unwrap();
    assert!(outcome.success);
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.tracking_status, TrackingStatus::Failed);

    carrier
        .expect_cancel()
        .return_err(rejected("Cannot cancel order in CANCELED status."));
    let err = sync.cancel_shipment(id).await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot cancel order in CANCELED status.");
    assert_eq!(
        sync.orders().fetch(id).await.unwrap().status,
        OrderStatus::Cancelled
    );
    carrier.verify();
}

#[tokio::test]
async fn test_delivered_order_is_not_cancelled_at_the_carrier() {
    let (sync, carrier) = setup();
    let id = shipped_order(&sync, &carrier, "SR1").await;
    carrier.expect_track().return_ok(snapshot("SR1", "DELIVERED"));
    sync.refresh_tracking(id).await.unwrap();

    let err = sync.cancel_shipment(id).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Order(OrderError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
        })
    ));
    assert_eq!(
        sync.orders().fetch(id).await.unwrap().status,
        OrderStatus::Delivered
    );
    assert!(!carrier
        .calls()
        .iter()
        .any(|call| matches!(call, CarrierCall::Cancel(_))));
    carrier.verify();
}

#[tokio::test]
async fn test_concurrent_creates_report_the_unrecorded_waybill() {
    let (sync, carrier) = setup();
    let id = sync.orders().place_order(placement()).await.unwrap();
    carrier.expect_create().return_ok(created("SR1"));
    carrier.expect_create().return_ok(created("SR2"));

    // both read the order before either booking is recorded
    let (first, second) = tokio::join!(sync.create_shipment(id), sync.create_shipment(id));
    let (recorded, err) = match (first, second) {
        (Ok(order), Err(err)) | (Err(err), Ok(order)) => (order, err),
        other => panic!("expected one success and one failure, got {other:?}"),
    };

    let recorded_waybill = recorded.tracking_number.clone().unwrap();
    let SyncError::Unrecorded {
        order_id,
        waybill,
        source,
    } = err
    else {
        panic!("expected an unrecorded shipment, got {err:?}");
    };
    assert_eq!(order_id, id);
    assert_ne!(waybill, recorded_waybill);
    assert!(matches!(source, OrderError::ShipmentAlreadyCreated(ref w) if *w == recorded_waybill));

    let stored = sync.orders().fetch(id).await.unwrap();
    assert_eq!(stored.tracking_number, Some(recorded_waybill));
    assert_eq!(stored.status, OrderStatus::Shipped);
    assert_eq!(carrier.calls().len(), 2);
    carrier.verify();
}

#[tokio::test]
async fn test_poll_round_skips_terminal_orders_and_counts_failures() {
    let (sync, carrier) = setup();
    let delivered = shipped_order(&sync, &carrier, "SR-D").await;
    carrier.expect_track().return_ok(snapshot("SR-D", "DELIVERED"));
    sync.refresh_tracking(delivered).await.unwrap();

    shipped_order(&sync, &carrier, "SR-A").await;
    shipped_order(&sync, &carrier, "SR-B").await;
    sync.orders().place_order(placement()).await.unwrap();

    carrier.expect_track().return_ok(snapshot("SR-A", "PICKED UP"));
    carrier.expect_track().return_err(rejected("Tracking temporarily unavailable"));

    let poller = TrackingPoller::new(sync.clone(), Duration::from_secs(300));
    let report = poller.poll_once().await;
    assert_eq!(
        report,
        PollReport {
            refreshed: 1,
            failed: 1
        }
    );
    carrier.verify();
}

#[tokio::test(start_paused = true)]
async fn test_poller_refreshes_after_one_period_and_stops() {
    let (sync, carrier) = setup();
    let id = shipped_order(&sync, &carrier, "SR-T").await;

    let handle = TrackingPoller::new(sync.clone(), Duration::from_secs(300)).spawn();

    // nothing happens before the first period elapses
    tokio::time::sleep(Duration::from_secs(299)).await;
    assert_eq!(
        sync.orders().fetch(id).await.unwrap().tracking_status,
        TrackingStatus::Pending
    );

    carrier.expect_track().return_ok(snapshot("SR-T", "IN TRANSIT"));
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(
        sync.orders().fetch(id).await.unwrap().tracking_status,
        TrackingStatus::InTransit
    );

    assert!(!handle.is_finished());
    handle.stop().await;
    // stopped: a further period makes no carrier calls (none are scripted)
    tokio::time::sleep(Duration::from_secs(600)).await;
    carrier.verify();
}
