//! # Order Client
//!
//! Provides a high-level API for interacting with the order store.
//! It wraps a `ResourceClient<Order>` and turns framework errors back into [`OrderError`].
use crate::model::{
    Order, OrderCreate, OrderFilter, OrderId, OrderUpdate, ShipmentCreated, TrackingSnapshot,
};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(items = params.items.len()))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        let id = self.inner.create(params).await.map_err(OrderError::from)?;
        info!(order_id = %id, "Order placed");
        Ok(id)
    }

    /// Fetch an order or fail with `NotFound`.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(OrderError::from)
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        self.list(filter).await
    }

    #[instrument(skip(self, created), fields(waybill = %created.waybill))]
    pub async fn record_shipment(
        &self,
        id: OrderId,
        created: ShipmentCreated,
    ) -> Result<Order, OrderError> {
        self.action(id, OrderAction::RecordShipment(created)).await
    }

    #[instrument(skip(self, snapshot), fields(carrier_status = %snapshot.carrier_status))]
    pub async fn apply_tracking(
        &self,
        id: OrderId,
        snapshot: TrackingSnapshot,
    ) -> Result<Order, OrderError> {
        self.action(id, OrderAction::ApplyTracking(snapshot)).await
    }

    #[instrument(skip(self))]
    pub async fn mark_shipment_cancelled(&self, id: OrderId) -> Result<Order, OrderError> {
        self.action(id, OrderAction::MarkShipmentCancelled).await
    }

    async fn action(&self, id: OrderId, action: OrderAction) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map(|result| result.into_order())
            .map_err(OrderError::from)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::from(e)
    }
}
