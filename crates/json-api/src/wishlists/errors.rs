//! Wishlist Errors

use salvo::http::StatusError;
use tracing::error;

use bazaar_app::domain::wishlists::WishlistsServiceError;

use crate::carts;

pub(crate) fn into_status_error(error: WishlistsServiceError) -> StatusError {
    match error {
        WishlistsServiceError::WishlistNotFound => {
            StatusError::not_found().brief("Wishlist not found")
        }
        WishlistsServiceError::ItemNotFound => {
            StatusError::not_found().brief("Item not found in wishlist")
        }
        WishlistsServiceError::ProductNotFound => {
            StatusError::not_found().brief("Product not found")
        }
        WishlistsServiceError::InsufficientStock {
            requested,
            available,
        } => StatusError::bad_request()
            .brief("Insufficient stock")
            .detail(format!("requested {requested}, available {available}")),
        WishlistsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        WishlistsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Wishlist already exists")
        }
        WishlistsServiceError::InvalidReference
        | WishlistsServiceError::MissingRequiredData
        | WishlistsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid wishlist payload")
        }
        WishlistsServiceError::Cart(source) => carts::errors::into_status_error(source),
        WishlistsServiceError::Sql(source) => {
            error!("wishlist storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
