//! Add To Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bazaar_app::domain::carts::{data::NewCartItem, records::SelectedOptions};

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    envelope::Envelope,
    extensions::*,
    state::State,
};

/// Add To Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddToCartRequest {
    pub product_uuid: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u64,

    /// Replaces any options already stored on the line
    #[serde(default)]
    pub selected_options: SelectedOptions,
}

impl From<AddToCartRequest> for NewCartItem {
    fn from(request: AddToCartRequest) -> Self {
        NewCartItem {
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
            selected_options: request.selected_options,
        }
    }
}

/// Add To Cart Handler
///
/// Adding a product already in the cart increases the line's quantity.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.add",
    skip(json, depot),
    fields(product_uuid = tracing::field::Empty, quantity = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddToCartRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<CartResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;
    let request = json.into_inner().validated()?;

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(request.product_uuid));
    span.record("quantity", request.quantity);

    let cart = state
        .app
        .carts
        .add_item(tenant, user, request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Item added to cart successfully", cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        products::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, TestState, customer_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        customer_service(
            TestState::new().with_carts(carts),
            Router::with_path("cart/add").post(handler),
        )
    }

    #[tokio::test]
    async fn test_add_to_cart_passes_options_through() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |_, user, item| {
                *user == TEST_USER_UUID
                    && item.product_uuid == product
                    && item.quantity == 2
                    && item.selected_options.get("size").map(String::as_str) == Some("M")
            })
            .return_once(|_, _, _| Ok(make_cart()));

        let mut res = TestClient::post("http://example.com/cart/add")
            .json(&json!({
                "productUuid": product.into_uuid(),
                "quantity": 2,
                "selectedOptions": { "size": "M" }
            }))
            .send(&make_service(carts))
            .await;

        let body: Envelope<CartResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Item added to cart successfully");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_to_cart_zero_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();

        let mut res = TestClient::post("http://example.com/cart/add")
            .json(&json!({ "productUuid": ProductUuid::new().into_uuid(), "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        let body: Envelope<serde_json::Value> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Quantity must be at least 1");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_to_cart_insufficient_stock_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().once().return_once(|_, _, _| {
            Err(CartsServiceError::InsufficientStock {
                requested: 5,
                available: 1,
            })
        });

        let mut res = TestClient::post("http://example.com/cart/add")
            .json(&json!({ "productUuid": ProductUuid::new().into_uuid(), "quantity": 5 }))
            .send(&make_service(carts))
            .await;

        let body: Envelope<serde_json::Value> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Insufficient stock");
        assert!(!body.success);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_product_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::ProductNotFound));

        let res = TestClient::post("http://example.com/cart/add")
            .json(&json!({ "productUuid": ProductUuid::new().into_uuid(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
