//! Wishlists service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::carts::CartsServiceError;

#[derive(Debug, Error)]
pub enum WishlistsServiceError {
    #[error("wishlist not found")]
    WishlistNotFound,

    #[error("item not found in wishlist")]
    ItemNotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u64 },

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("wishlist already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("cart update failed")]
    Cart(#[source] CartsServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for WishlistsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::WishlistNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<CartsServiceError> for WishlistsServiceError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::ProductNotFound => Self::ProductNotFound,
            CartsServiceError::InsufficientStock {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
            CartsServiceError::InvalidQuantity => Self::InvalidQuantity,
            CartsServiceError::Sql(error) => Self::Sql(error),
            other => Self::Cart(other),
        }
    }
}
