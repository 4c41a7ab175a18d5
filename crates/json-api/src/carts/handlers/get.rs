//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::carts::records::{
    CartItemRecord, CartRecord, Coupon, DiscountType, SelectedOptions,
};

use crate::{carts::errors::into_status_error, envelope::Envelope, extensions::*, state::State};

/// Discount type as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Discount {
    Percentage,
    Fixed,
}

impl From<Discount> for DiscountType {
    fn from(discount: Discount) -> Self {
        match discount {
            Discount::Percentage => DiscountType::Percentage,
            Discount::Fixed => DiscountType::Fixed,
        }
    }
}

impl From<DiscountType> for Discount {
    fn from(discount: DiscountType) -> Self {
        match discount {
            DiscountType::Percentage => Discount::Percentage,
            DiscountType::Fixed => Discount::Fixed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponResponse {
    pub code: String,
    pub discount_amount: u64,
    pub discount_type: Discount,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        CouponResponse {
            code: coupon.code,
            discount_amount: coupon.discount_amount,
            discount_type: coupon.discount_type.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub quantity: u64,

    /// Unit price captured when the line was last refreshed
    pub price: u64,

    pub total_price: u64,

    pub is_available: bool,

    pub stock_available: u64,

    pub selected_options: SelectedOptions,

    pub added_at: String,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        let total_price = item.total_price();

        CartItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity,
            price: item.unit_price,
            total_price,
            is_available: item.is_available,
            stock_available: item.stock_available,
            selected_options: item.selected_options,
            added_at: item.added_at.to_string(),
        }
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    pub uuid: Uuid,

    pub items: Vec<CartItemResponse>,

    pub subtotal: u64,

    pub discount: u64,

    pub total: u64,

    /// Units across every line
    pub total_items: u64,

    pub applied_coupon: Option<CouponResponse>,

    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        let subtotal = cart.subtotal();
        let discount = cart.discount();
        let total = cart.total();
        let total_items = cart.total_items();

        CartResponse {
            uuid: cart.uuid.into(),
            items: cart.items.into_iter().map(Into::into).collect(),
            subtotal,
            discount,
            total,
            total_items,
            applied_coupon: cart.coupon.map(Into::into),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Get Cart Handler
///
/// Creates an empty cart on first use and refreshes every line's snapshot.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart retrieved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.get", skip_all, err)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<CartResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let cart = state
        .app
        .carts
        .get_cart(tenant, user)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Cart retrieved successfully", cart.into()))
}
