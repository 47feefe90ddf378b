use crate::carrier::CarrierError;
use crate::order_actor::OrderError;
use crate::sync::SyncError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Carrier(#[from] CarrierError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Order(e) => order_status(e),
            AppError::Carrier(_) => StatusCode::BAD_GATEWAY,
            AppError::Sync(SyncError::Order(e)) => order_status(e),
            AppError::Sync(SyncError::Carrier(_)) => StatusCode::BAD_GATEWAY,
            AppError::Sync(SyncError::Unrecorded { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn order_status(e: &OrderError) -> StatusCode {
    match e {
        OrderError::NotFound(_) => StatusCode::NOT_FOUND,
        OrderError::Validation(_) => StatusCode::BAD_REQUEST,
        OrderError::InvalidTransition { .. }
        | OrderError::ShipmentAlreadyCreated(_)
        | OrderError::NoShipment(_) => StatusCode::CONFLICT,
        OrderError::ActorCommunicationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, OrderStatus, Waybill};

    #[test]
    fn test_unrecorded_shipment_is_a_server_error() {
        let err = AppError::from(SyncError::Unrecorded {
            order_id: OrderId(3),
            waybill: Waybill::from("SR2"),
            source: OrderError::ShipmentAlreadyCreated(Waybill::from("SR1")),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("SR2"));
    }

    #[test]
    fn test_order_and_carrier_errors_keep_their_status() {
        let refused = AppError::from(SyncError::Order(OrderError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
        }));
        assert_eq!(refused.status(), StatusCode::CONFLICT);

        let carrier = AppError::from(SyncError::Carrier(CarrierError::Rejected {
            status: 400,
            message: "Cannot cancel order in CANCELED status.".into(),
        }));
        assert_eq!(carrier.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(carrier.to_string(), "Cannot cancel order in CANCELED status.");
    }
}
