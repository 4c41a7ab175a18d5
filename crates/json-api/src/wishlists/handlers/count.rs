//! Wishlist Count Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{envelope::Envelope, extensions::*, state::State, wishlists::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistCountResponse {
    pub count: u64,
}

/// Wishlist Count Handler
#[endpoint(
    tags("wishlist"),
    summary = "Wishlist Item Count",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Wishlist count retrieved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "wishlists.count", skip_all, err)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<WishlistCountResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let count = state
        .app
        .wishlists
        .count_items(tenant, user)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Wishlist count retrieved successfully",
        WishlistCountResponse { count },
    ))
}
