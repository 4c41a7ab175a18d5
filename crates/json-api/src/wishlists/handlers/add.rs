//! Add To Wishlist Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    extensions::*,
    state::State,
    wishlists::{errors::into_status_error, get::WishlistResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddToWishlistRequest {
    pub product_uuid: Uuid,
}

/// Add To Wishlist Handler
///
/// Adding a product twice keeps one line and refreshes its snapshot.
#[endpoint(
    tags("wishlist"),
    summary = "Add Item to Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "wishlists.add", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<AddToWishlistRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<WishlistResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let wishlist = state
        .app
        .wishlists
        .add_item(tenant, user, json.into_inner().product_uuid.into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Item added to wishlist successfully", wishlist.into()))
}
