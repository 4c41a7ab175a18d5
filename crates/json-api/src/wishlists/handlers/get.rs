//! Get Wishlist Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::wishlists::records::{WishlistItemRecord, WishlistRecord};

use crate::{envelope::Envelope, extensions::*, state::State, wishlists::errors::into_status_error};

/// Wishlist Item Response
///
/// Product fields are the snapshot refreshed on read.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub product_price: u64,
    pub product_image: Option<String>,
    pub product_sku: String,
    pub is_available: bool,
    pub added_at: String,
}

impl From<WishlistItemRecord> for WishlistItemResponse {
    fn from(item: WishlistItemRecord) -> Self {
        WishlistItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            product_name: item.product_name,
            product_price: item.product_price,
            product_image: item.product_image,
            product_sku: item.product_sku,
            is_available: item.is_available,
            added_at: item.added_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistResponse {
    pub uuid: Uuid,

    /// Newest first
    pub items: Vec<WishlistItemResponse>,

    pub total_items: usize,

    pub updated_at: String,
}

impl From<WishlistRecord> for WishlistResponse {
    fn from(wishlist: WishlistRecord) -> Self {
        let total_items = wishlist.total_items();

        WishlistResponse {
            uuid: wishlist.uuid.into(),
            items: wishlist.items.into_iter().map(Into::into).collect(),
            total_items,
            updated_at: wishlist.updated_at.to_string(),
        }
    }
}

/// Get Wishlist Handler
#[endpoint(
    tags("wishlist"),
    summary = "Get Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Wishlist retrieved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "wishlists.get", skip_all, err)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<WishlistResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let wishlist = state
        .app
        .wishlists
        .get_wishlist(tenant, user)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Wishlist retrieved successfully", wishlist.into()))
}
