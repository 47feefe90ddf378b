use crate::api::AppState;
use crate::carrier::{build_carrier, Carrier, CarrierError, PackageDimensions};
use crate::clients::OrderClient;
use crate::config::Config;
use crate::order_actor;
use crate::sync::{PollerHandle, ShipmentSync, TrackingPoller};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::info;

/// The running storefront: order actor, carrier, sync service and tracking poller.
pub struct StoreSystem {
    pub orders: OrderClient,
    pub sync: ShipmentSync,
    poller: Option<PollerHandle>,
    order_handle: JoinHandle<()>,
}

impl StoreSystem {
    /// Build the configured carrier client and start everything.
    pub fn start(config: &Config) -> Result<Self, CarrierError> {
        let carrier = build_carrier(&config.carrier, config.carrier_timeout)?;
        info!(carrier = %carrier.kind(), "Carrier client ready");
        Ok(Self::with_carrier(carrier, config.package, config.poll_interval))
    }

    /// Start with an already built carrier (a fake one in tests). A zero interval
    /// disables the poller, as `None` does.
    pub fn with_carrier(
        carrier: Arc<dyn Carrier>,
        package: PackageDimensions,
        poll_interval: Option<Duration>,
    ) -> Self {
        // 1. Create the store
        let (order_actor, order_generic) = order_actor::new();

        // 2. Start it; orders need no injected dependencies
        let order_handle = tokio::spawn(order_actor.run(()));
        let orders = OrderClient::new(order_generic);

        // 3. Services on top of the store
        let sync = ShipmentSync::new(orders.clone(), carrier, package);
        let poller = poll_interval
            .filter(|period| !period.is_zero())
            .map(|period| TrackingPoller::new(sync.clone(), period).spawn());
        if poller.is_none() {
            info!("Tracking poller disabled");
        }

        Self {
            orders,
            sync,
            poller,
            order_handle,
        }
    }

    pub fn has_poller(&self) -> bool {
        self.poller.as_ref().is_some_and(|poller| !poller.is_finished())
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.sync.clone())
    }

    /// Stop the poller, release the clients and wait for the order actor to exit.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        let Self {
            orders,
            sync,
            poller,
            order_handle,
        } = self;

        if let Some(poller) = poller {
            poller.stop().await;
        }
        drop(sync);
        drop(orders);

        order_handle.await?;
        info!("Store system stopped");
        Ok(())
    }
}
