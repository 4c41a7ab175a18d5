//! Apply Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use bazaar_app::domain::carts::records::Coupon;

use crate::{
    carts::{
        errors::into_status_error,
        get::{CartResponse, Discount},
    },
    envelope::Envelope,
    extensions::*,
    state::State,
};

/// Apply Coupon Request
///
/// Percentage amounts are whole percentages; fixed amounts are minor units.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplyCouponRequest {
    #[validate(length(min = 1, message = "Coupon code is required"))]
    pub code: String,

    #[validate(range(min = 1, message = "Discount amount must be positive"))]
    pub discount_amount: u64,

    pub discount_type: Discount,
}

impl From<ApplyCouponRequest> for Coupon {
    fn from(request: ApplyCouponRequest) -> Self {
        Coupon {
            code: request.code,
            discount_amount: request.discount_amount,
            discount_type: request.discount_type.into(),
        }
    }
}

/// Apply Coupon Handler
#[endpoint(
    tags("cart"),
    summary = "Apply Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon applied"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid coupon"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.apply_coupon", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<ApplyCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<CartResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;
    let request = json.into_inner().validated()?;

    let cart = state
        .app
        .carts
        .apply_coupon(tenant, user, request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Coupon applied successfully", cart.into()))
}
