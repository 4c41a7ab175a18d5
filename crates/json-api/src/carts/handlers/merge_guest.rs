//! Merge Guest Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    envelope::Envelope,
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MergeGuestCartRequest {
    pub guest_cart_id: Uuid,
    pub guest_user_id: Uuid,
}

/// Merge Guest Cart Handler
///
/// Folds the guest cart's lines into the caller's cart, clamped to live
/// stock, and retires the guest cart. The guest session's user id must own
/// the cart.
#[endpoint(
    tags("cart"),
    summary = "Merge Guest Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Carts merged"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.merge_guest", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<MergeGuestCartRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<CartResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;
    let MergeGuestCartRequest {
        guest_cart_id: guest,
        guest_user_id,
    } = json.into_inner();

    let cart = state
        .app
        .carts
        .merge_guest_cart(tenant, user, guest_user_id.into(), guest.into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(guest_cart_uuid = %guest, cart_uuid = %cart.uuid, "merged guest cart");

    Ok(Envelope::ok("Guest cart merged successfully", cart.into()))
}
