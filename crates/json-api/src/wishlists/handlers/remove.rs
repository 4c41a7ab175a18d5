//! Remove From Wishlist Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    extensions::*,
    state::State,
    wishlists::{errors::into_status_error, get::WishlistResponse},
};

/// Remove From Wishlist Handler
#[endpoint(
    tags("wishlist"),
    summary = "Remove Item from Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Wishlist or item not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "wishlists.remove", skip_all, err)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<WishlistResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let wishlist = state
        .app
        .wishlists
        .remove_item(tenant, user, product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Item removed from wishlist successfully",
        wishlist.into(),
    ))
}
