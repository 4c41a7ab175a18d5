//! Move To Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    carts::get::CartResponse,
    envelope::Envelope,
    extensions::*,
    state::State,
    wishlists::{errors::into_status_error, get::WishlistResponse},
};

const fn default_quantity() -> u64 {
    1
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveToCartRequest {
    pub product_uuid: Uuid,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MovedToCartResponse {
    pub wishlist: WishlistResponse,
    pub cart: CartResponse,
}

/// Move To Cart Handler
///
/// Takes the product off the wishlist and adds it to the cart in one step;
/// neither side changes when the cart add is rejected.
#[endpoint(
    tags("wishlist"),
    summary = "Move Wishlist Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item moved to cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Wishlist, item or product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "wishlists.move_to_cart", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<MoveToCartRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<MovedToCartResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;
    let request = json.into_inner().validated()?;

    let moved = state
        .app
        .wishlists
        .move_to_cart(tenant, user, request.product_uuid.into(), request.quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Item moved to cart successfully",
        MovedToCartResponse {
            wishlist: moved.wishlist.into(),
            cart: moved.cart.into(),
        },
    ))
}
