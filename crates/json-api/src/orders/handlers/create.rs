//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bazaar_app::domain::orders::{
    data::{NewOrder, NewOrderItem},
    records::{OrderAddress, OrderUuid},
};

use crate::{
    envelope::Envelope,
    extensions::*,
    observability::record_order_placed,
    orders::{
        errors::into_status_error,
        get::{Method, OrderResponse},
    },
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemRequest {
    pub product_uuid: Uuid,

    #[validate(length(min = 1, message = "Item title is required"))]
    pub title: String,

    pub image: Option<String>,

    pub price: u64,

    #[validate(range(min = 1, message = "Item quantity must be at least 1"))]
    pub quantity: u64,

    pub total_price: u64,
}

impl From<OrderItemRequest> for NewOrderItem {
    fn from(item: OrderItemRequest) -> Self {
        NewOrderItem {
            product_uuid: item.product_uuid.into(),
            title: item.title,
            image: item.image,
            price: item.price,
            quantity: item.quantity,
            total_price: item.total_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderAddressRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,

    #[validate(length(min = 1, max = 20, message = "Mobile number is invalid"))]
    pub mobile_no: String,
}

impl From<OrderAddressRequest> for OrderAddress {
    fn from(address: OrderAddressRequest) -> Self {
        OrderAddress {
            first_name: address.first_name,
            last_name: address.last_name,
            address: address.address,
            country: address.country,
            mobile_no: address.mobile_no,
        }
    }
}

const fn clear_cart_by_default() -> bool {
    true
}

/// Create Order Request
///
/// Totals are supplied by the client and must add up exactly.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    #[validate(
        length(min = 1, message = "Order must contain at least one item"),
        nested
    )]
    pub items: Vec<OrderItemRequest>,

    #[validate(nested)]
    pub shipping_address: OrderAddressRequest,

    #[validate(nested)]
    pub billing_address: OrderAddressRequest,

    pub payment_method: Method,

    pub subtotal: u64,

    #[serde(default)]
    pub tax: u64,

    #[serde(default)]
    pub discount: u64,

    #[serde(default)]
    pub shipping_cost: u64,

    pub total: u64,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    #[serde(default = "clear_cart_by_default")]
    pub clear_cart: bool,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: OrderUuid::new(),
            items: request.items.into_iter().map(Into::into).collect(),
            shipping_address: request.shipping_address.into(),
            billing_address: request.billing_address.into(),
            payment_method: request.payment_method.into(),
            subtotal: request.subtotal,
            tax: request.tax,
            discount: request.discount,
            shipping_cost: request.shipping_cost,
            total: request.total,
            notes: request.notes,
            clear_cart: request.clear_cart,
        }
    }
}

/// Create Order Handler
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.create", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;
    let request = json.into_inner().validated()?;

    let order = state
        .app
        .orders
        .create_order(tenant, user, request.into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(
        order_uuid = %order.uuid,
        order_number = %order.order_number,
        total = order.total,
        "placed order"
    );

    record_order_placed();

    res.add_header(LOCATION, format!("/v1/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Envelope::ok("Order created successfully", order.into()))
}
