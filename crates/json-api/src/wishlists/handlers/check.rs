//! Check Wishlist Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{envelope::Envelope, extensions::*, state::State, wishlists::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistStatusResponse {
    pub in_wishlist: bool,
}

/// Check Wishlist Status Handler
#[endpoint(
    tags("wishlist"),
    summary = "Check Wishlist Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Wishlist status retrieved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "wishlists.check", skip_all, err)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<WishlistStatusResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let in_wishlist = state
        .app
        .wishlists
        .is_in_wishlist(tenant, user, product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Wishlist status retrieved successfully",
        WishlistStatusResponse { in_wishlist },
    ))
}
