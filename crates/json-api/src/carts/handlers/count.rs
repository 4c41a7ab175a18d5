//! Cart Count Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{carts::errors::into_status_error, envelope::Envelope, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartCountResponse {
    pub count: u64,
}

/// Cart Count Handler
///
/// Reports zero without creating a cart when the user has none.
#[endpoint(
    tags("cart"),
    summary = "Cart Item Count",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart count retrieved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.count", skip_all, err)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<CartCountResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let count = state
        .app
        .carts
        .count_items(tenant, user)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Cart count retrieved successfully",
        CartCountResponse { count },
    ))
}
