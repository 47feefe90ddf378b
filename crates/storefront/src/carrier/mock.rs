//! # MockCarrier
//!
//! A [`Carrier`] that answers from a queue of scripted replies and records every call.
//! Same shape as [`resource_actor::mock::MockClient`]: script, exercise, verify.
//!
//! ```rust,ignore
//! let carrier = Arc::new(MockCarrier::new(CarrierKind::Delhivery));
//! carrier.expect_create().return_ok(created);
//! carrier.expect_cancel().return_err(CarrierError::Rejected {
//!     status: 422,
//!     message: "Shipment is already cancelled".into(),
//! });
//!
//! let sync = ShipmentSync::new(orders, carrier.clone(), PackageDimensions::default());
//! // ...
//! carrier.verify();
//! ```
//!
//! A call that does not match the next scripted reply panics.

use super::{Carrier, CarrierError, ShipmentRequest};
use crate::model::{
    CancelOutcome, CarrierKind, Serviceability, ShipmentCreated, TrackingSnapshot, Waybill,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Reply {
    Create(Result<ShipmentCreated, CarrierError>),
    Track(Result<TrackingSnapshot, CarrierError>),
    Cancel(Result<CancelOutcome, CarrierError>),
    Serviceability(Result<Serviceability, CarrierError>),
}

impl Reply {
    fn kind(&self) -> &'static str {
        match self {
            Reply::Create(_) => "create_shipment",
            Reply::Track(_) => "track_shipment",
            Reply::Cancel(_) => "cancel_shipment",
            Reply::Serviceability(_) => "check_serviceability",
        }
    }
}

/// One call received by the mock, with its argument.
#[derive(Debug, Clone, PartialEq)]
pub enum CarrierCall {
    Create(ShipmentRequest),
    Track(Waybill),
    Cancel(Waybill),
    Serviceability(String),
}

pub struct MockCarrier {
    kind: CarrierKind,
    replies: Arc<Mutex<VecDeque<Reply>>>,
    calls: Mutex<Vec<CarrierCall>>,
}

/// Builder returned by the `expect_*` methods.
pub struct ReplyBuilder<R> {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    wrap: fn(Result<R, CarrierError>) -> Reply,
}

impl<R> ReplyBuilder<R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: CarrierError) {
        self.push(Err(error));
    }

    fn push(self, result: Result<R, CarrierError>) {
        self.replies
            .lock()
            .expect("mock carrier lock poisoned")
            .push_back((self.wrap)(result));
    }
}

impl MockCarrier {
    pub fn new(kind: CarrierKind) -> Self {
        Self {
            kind,
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn builder<R>(&self, wrap: fn(Result<R, CarrierError>) -> Reply) -> ReplyBuilder<R> {
        ReplyBuilder {
            replies: self.replies.clone(),
            wrap,
        }
    }

    pub fn expect_create(&self) -> ReplyBuilder<ShipmentCreated> {
        self.builder(Reply::Create)
    }

    pub fn expect_track(&self) -> ReplyBuilder<TrackingSnapshot> {
        self.builder(Reply::Track)
    }

    pub fn expect_cancel(&self) -> ReplyBuilder<CancelOutcome> {
        self.builder(Reply::Cancel)
    }

    pub fn expect_serviceability(&self) -> ReplyBuilder<Serviceability> {
        self.builder(Reply::Serviceability)
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<CarrierCall> {
        self.calls.lock().expect("mock carrier lock poisoned").clone()
    }

    /// Panics if scripted replies were left unused.
    pub fn verify(&self) {
        let replies = self.replies.lock().expect("mock carrier lock poisoned");
        if !replies.is_empty() {
            let pending: Vec<_> = replies.iter().map(Reply::kind).collect();
            panic!("MockCarrier has unmet expectations: {pending:?}");
        }
    }

    fn next(&self, call: CarrierCall) -> Reply {
        let name = match &call {
            CarrierCall::Create(_) => "create_shipment",
            CarrierCall::Track(_) => "track_shipment",
            CarrierCall::Cancel(_) => "cancel_shipment",
            CarrierCall::Serviceability(_) => "check_serviceability",
        };
        self.calls
            .lock()
            .expect("mock carrier lock poisoned")
            .push(call);
        self.replies
            .lock()
            .expect("mock carrier lock poisoned")
            .pop_front()
            .unwrap_or_else(|| panic!("MockCarrier: unexpected {name} call, nothing scripted"))
    }
}

#[async_trait]
impl Carrier for MockCarrier {
    fn kind(&self) -> CarrierKind {
        self.kind
    }

    async fn create_shipment(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentCreated, CarrierError> {
        match self.next(CarrierCall::Create(request.clone())) {
            Reply::Create(result) => result,
            other => panic!("MockCarrier: expected {}, got create_shipment", other.kind()),
        }
    }

    async fn track_shipment(&self, waybill: &Waybill) -> Result<TrackingSnapshot, CarrierError> {
        match self.next(CarrierCall::Track(waybill.clone())) {
            Reply::Track(result) => result,
            other => panic!("MockCarrier: expected {}, got track_shipment", other.kind()),
        }
    }

    async fn cancel_shipment(&self, waybill: &Waybill) -> Result<CancelOutcome, CarrierError> {
        match self.next(CarrierCall::Cancel(waybill.clone())) {
            Reply::Cancel(result) => result,
            other => panic!("MockCarrier: expected {}, got cancel_shipment", other.kind()),
        }
    }

    async fn check_serviceability(&self, pincode: &str) -> Result<Serviceability, CarrierError> {
        match self.next(CarrierCall::Serviceability(pincode.to_string())) {
            Reply::Serviceability(result) => result,
            other => panic!(
                "MockCarrier: expected {}, got check_serviceability",
                other.kind()
            ),
        }
    }
}
