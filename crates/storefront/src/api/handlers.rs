use super::error::AppError;
use super::state::AppState;
use crate::model::{
    CancelOutcome, CarrierKind, Order, OrderCreate, OrderFilter, OrderId, OrderStatus,
    OrderUpdate, Serviceability, TrackingStatus, Waybill,
};
use crate::order_actor::entity::is_pincode;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Stored tracking fields of one order. Reading them never calls the carrier.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub tracking_number: Option<Waybill>,
    pub tracking_status: TrackingStatus,
    pub carrier: Option<CarrierKind>,
    pub tracking_url: Option<String>,
    pub carrier_status: Option<String>,
    pub last_location: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl From<&Order> for TrackingView {
    fn from(order: &Order) -> Self {
        let shipment = order.shipment.as_ref();
        Self {
            order_id: order.id,
            status: order.status,
            tracking_number: order.tracking_number.clone(),
            tracking_status: order.tracking_status,
            carrier: shipment.map(|s| s.carrier),
            tracking_url: shipment.and_then(|s| s.tracking_url.clone()),
            carrier_status: shipment.and_then(|s| s.carrier_status.clone()),
            last_location: shipment.and_then(|s| s.last_location.clone()),
            last_synced_at: shipment.and_then(|s| s.last_synced_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub order: Order,
    pub cancellation: CancelOutcome,
}

fn order_id(raw: &str) -> Result<OrderId, AppError> {
    OrderId::parse(raw).ok_or_else(|| AppError::BadRequest(format!("'{raw}' is not an order id")))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let Json(params) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let id = state.orders.place_order(params).await?;
    let order = state.orders.fetch(id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.orders.fetch(order_id(&id)?).await?))
}

pub async fn get_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackingView>, AppError> {
    let order = state.orders.fetch(order_id(&id)?).await?;
    Ok(Json(TrackingView::from(&order)))
}

pub async fn list_orders(
    State(state): State<AppState>,
    filter: Result<Query<OrderFilter>, QueryRejection>,
) -> Result<Json<Vec<Order>>, AppError> {
    let Query(filter) = filter.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(state.orders.list_orders(filter).await?))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<OrderUpdate>, JsonRejection>,
) -> Result<Json<Order>, AppError> {
    let id = order_id(&id)?;
    let Json(update) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    info!(order_id = %id, ?update, "Admin edit");
    Ok(Json(state.orders.update_order(id, update).await?))
}

pub async fn create_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.sync.create_shipment(order_id(&id)?).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn cancel_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>, AppError> {
    let (order, cancellation) = state.sync.cancel_shipment(order_id(&id)?).await?;
    Ok(Json(CancelResponse {
        order,
        cancellation,
    }))
}

pub async fn refresh_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.sync.refresh_tracking(order_id(&id)?).await?))
}

pub async fn check_serviceability(
    State(state): State<AppState>,
    Path(pincode): Path<String>,
) -> Result<Json<Serviceability>, AppError> {
    if !is_pincode(&pincode) {
        return Err(AppError::BadRequest(format!(
            "'{pincode}' is not a six-digit pincode"
        )));
    }
    Ok(Json(state.carrier().check_serviceability(&pincode).await?))
}
