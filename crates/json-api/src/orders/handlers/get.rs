//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::orders::records::{
    OrderAddress, OrderItemRecord, OrderRecord, OrderStatus, PaymentMethod, PaymentStatus,
};

use crate::{envelope::Envelope, extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Status {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl From<Status> for OrderStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => OrderStatus::Pending,
            Status::Confirmed => OrderStatus::Confirmed,
            Status::Processing => OrderStatus::Processing,
            Status::Shipped => OrderStatus::Shipped,
            Status::Delivered => OrderStatus::Delivered,
            Status::Cancelled => OrderStatus::Cancelled,
            Status::Returned => OrderStatus::Returned,
        }
    }
}

impl From<OrderStatus> for Status {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => Status::Pending,
            OrderStatus::Confirmed => Status::Confirmed,
            OrderStatus::Processing => Status::Processing,
            OrderStatus::Shipped => Status::Shipped,
            OrderStatus::Delivered => Status::Delivered,
            OrderStatus::Cancelled => Status::Cancelled,
            OrderStatus::Returned => Status::Returned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Payment {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl From<Payment> for PaymentStatus {
    fn from(payment: Payment) -> Self {
        match payment {
            Payment::Pending => PaymentStatus::Pending,
            Payment::Paid => PaymentStatus::Paid,
            Payment::Failed => PaymentStatus::Failed,
            Payment::Refunded => PaymentStatus::Refunded,
        }
    }
}

impl From<PaymentStatus> for Payment {
    fn from(payment: PaymentStatus) -> Self {
        match payment {
            PaymentStatus::Pending => Payment::Pending,
            PaymentStatus::Paid => Payment::Paid,
            PaymentStatus::Failed => Payment::Failed,
            PaymentStatus::Refunded => Payment::Refunded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Method {
    CreditCard,
    DebitCard,
    Paypal,
    CashOnDelivery,
}

impl From<Method> for PaymentMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::CreditCard => PaymentMethod::CreditCard,
            Method::DebitCard => PaymentMethod::DebitCard,
            Method::Paypal => PaymentMethod::Paypal,
            Method::CashOnDelivery => PaymentMethod::CashOnDelivery,
        }
    }
}

impl From<PaymentMethod> for Method {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::CreditCard => Method::CreditCard,
            PaymentMethod::DebitCard => Method::DebitCard,
            PaymentMethod::Paypal => Method::Paypal,
            PaymentMethod::CashOnDelivery => Method::CashOnDelivery,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderAddressResponse {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub country: String,
    pub mobile_no: String,
}

impl From<OrderAddress> for OrderAddressResponse {
    fn from(address: OrderAddress) -> Self {
        OrderAddressResponse {
            first_name: address.first_name,
            last_name: address.last_name,
            address: address.address,
            country: address.country,
            mobile_no: address.mobile_no,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub price: u64,
    pub quantity: u64,
    pub total_price: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            title: item.title,
            image: item.image,
            price: item.price,
            quantity: item.quantity,
            total_price: item.total_price,
        }
    }
}

/// Order Response
///
/// Amounts are minor units; timestamps are RFC 3339.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub order_number: Uuid,
    pub user_uuid: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub shipping_address: OrderAddressResponse,
    pub billing_address: OrderAddressResponse,
    pub payment_method: Method,
    pub payment_status: Payment,
    pub order_status: Status,
    pub subtotal: u64,
    pub tax: u64,
    pub discount: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub notes: Option<String>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<String>,
    pub delivered_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            order_number: order.order_number,
            user_uuid: order.user_uuid.into(),
            items: order.items.into_iter().map(Into::into).collect(),
            shipping_address: order.shipping_address.into(),
            billing_address: order.billing_address.into(),
            payment_method: order.payment_method.into(),
            payment_status: order.payment_status.into(),
            order_status: order.order_status.into(),
            subtotal: order.subtotal,
            tax: order.tax,
            discount: order.discount,
            shipping_cost: order.shipping_cost,
            total: order.total,
            notes: order.notes,
            tracking_number: order.tracking_number,
            estimated_delivery: order.estimated_delivery.map(|at| at.to_string()),
            cancellation_reason: order.cancellation_reason,
            cancelled_at: order.cancelled_at.map(|at| at.to_string()),
            delivered_at: order.delivered_at.map(|at| at.to_string()),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Customers only see their own orders; admins see any order in the tenant.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order retrieved"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.get", skip_all, err)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .get_order(principal.tenant, order.into_inner().into(), principal.user)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Order retrieved successfully", order.into()))
}
