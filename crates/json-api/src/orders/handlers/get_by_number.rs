//! Get Order By Number Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Get Order By Number Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order by Number",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order retrieved"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.get_by_number", skip_all, err)]
pub(crate) async fn handler(
    number: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let order = state
        .app
        .orders
        .get_order_by_number(tenant, user, number.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Order retrieved successfully", order.into()))
}
