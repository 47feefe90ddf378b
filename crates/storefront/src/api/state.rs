use crate::carrier::Carrier;
use crate::clients::OrderClient;
use crate::sync::ShipmentSync;
use std::sync::Arc;

/// Shared handler state. Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderClient,
    pub sync: ShipmentSync,
}

impl AppState {
    pub fn new(sync: ShipmentSync) -> Self {
        Self {
            orders: sync.orders().clone(),
            sync,
        }
    }

    pub fn carrier(&self) -> &Arc<dyn Carrier> {
        self.sync.carrier()
    }
}
