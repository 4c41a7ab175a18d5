//! Bulk Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{errors::into_status_error, get::Status},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkStatusRequest {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 orders are required"))]
    pub orders: Vec<Uuid>,

    pub status: Status,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkStatusResponse {
    pub updated: u64,
}

/// Bulk Update Order Status Handler
///
/// Unknown order UUIDs are skipped; the response counts the orders changed.
#[endpoint(
    tags("orders"),
    summary = "Bulk Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order statuses updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.bulk_status", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<BulkStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<BulkStatusResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.admin_or_403()?;
    let request = json.into_inner().validated()?;

    let updated = state
        .app
        .orders
        .bulk_update_order_status(
            tenant,
            request.orders.into_iter().map(Into::into).collect(),
            request.status.into(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Order statuses updated successfully",
        BulkStatusResponse { updated },
    ))
}
