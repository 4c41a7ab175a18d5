//! Update Order Status Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bazaar_app::domain::orders::data::OrderStatusUpdate;

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{
        errors::into_status_error,
        get::{OrderResponse, Payment, Status},
    },
    state::State,
};

/// Update Order Status Request
///
/// Omitted optional fields are left as they are.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateOrderStatusRequest {
    pub status: Status,

    pub payment_status: Option<Payment>,

    #[validate(length(min = 1, max = 100, message = "Tracking number is invalid"))]
    pub tracking_number: Option<String>,

    /// RFC 3339 timestamp
    pub estimated_delivery: Option<String>,
}

/// Update Order Status Handler
///
/// Any status may be set; moves against the usual fulfilment flow are logged.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_status",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, order_status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.admin_or_403()?;
    let request = json.into_inner().validated()?;
    let order = order.into_inner();

    let estimated_delivery = request
        .estimated_delivery
        .as_deref()
        .map(str::parse::<Timestamp>)
        .transpose()
        .or_400("Estimated delivery must be an RFC 3339 timestamp")?;

    let update = OrderStatusUpdate {
        order_status: request.status.into(),
        payment_status: request.payment_status.map(Into::into),
        tracking_number: request.tracking_number,
        estimated_delivery,
    };

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));
    span.record("order_status", tracing::field::display(update.order_status));

    let updated = state
        .app
        .orders
        .update_order_status(tenant, order.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Order status updated successfully", updated.into()))
}
