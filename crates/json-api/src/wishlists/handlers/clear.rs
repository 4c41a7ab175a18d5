//! Clear Wishlist Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::Envelope,
    extensions::*,
    state::State,
    wishlists::{errors::into_status_error, get::WishlistResponse},
};

/// Clear Wishlist Handler
#[endpoint(
    tags("wishlist"),
    summary = "Clear Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Wishlist cleared"),
        (status_code = StatusCode::NOT_FOUND, description = "Wishlist not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "wishlists.clear", skip_all, err)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<WishlistResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let wishlist = state
        .app
        .wishlists
        .clear_wishlist(tenant, user)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Wishlist cleared successfully", wishlist.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazaar_app::domain::wishlists::{MockWishlistsService, WishlistsServiceError};

    use crate::test_helpers::{TestState, customer_service, make_wishlist};

    use super::*;

    fn make_service(wishlists: MockWishlistsService) -> Service {
        customer_service(
            TestState::new().with_wishlists(wishlists),
            Router::with_path("wishlist/clear").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_clear_wishlist_success() -> TestResult {
        let mut wishlists = MockWishlistsService::new();

        wishlists
            .expect_clear_wishlist()
            .once()
            .return_once(|_, _| Ok(make_wishlist()));

        let mut res = TestClient::delete("http://example.com/wishlist/clear")
            .send(&make_service(wishlists))
            .await;

        let body: Envelope<WishlistResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.data.total_items, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_without_wishlist_returns_404() -> TestResult {
        let mut wishlists = MockWishlistsService::new();

        wishlists
            .expect_clear_wishlist()
            .once()
            .return_once(|_, _| Err(WishlistsServiceError::WishlistNotFound));

        let mut res = TestClient::delete("http://example.com/wishlist/clear")
            .send(&make_service(wishlists))
            .await;

        let body: Envelope<serde_json::Value> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "Wishlist not found");

        Ok(())
    }
}
