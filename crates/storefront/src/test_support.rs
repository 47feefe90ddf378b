//! Fixtures shared by the unit tests.

use crate::model::{Order, OrderCreate, OrderId, OrderItem, PaymentMode, ShippingAddress};
use resource_actor::ActorEntity;

pub fn placement(payment_mode: PaymentMode, transaction_id: Option<&str>) -> OrderCreate {
    OrderCreate {
        items: vec![OrderItem {
            name: "Shilajit Resin 20g".into(),
            quantity: 2,
            price: 1499.0,
        }],
        shipping_address: ShippingAddress {
            name: "Asha Verma".into(),
            phone: "9876543210".into(),
            email: Some("asha@example.com".into()),
            line1: "12 MG Road".into(),
            line2: None,
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            pincode: "560001".into(),
            country: "India".into(),
        },
        payment_mode,
        transaction_id: transaction_id.map(String::from),
        idempotency_key: Some("idem-1".into()),
    }
}

/// A freshly placed COD order.
pub fn order(id: OrderId) -> Order {
    Order::from_create_params(id, placement(PaymentMode::Cod, None))
        .expect("fixture placement is valid")
}
