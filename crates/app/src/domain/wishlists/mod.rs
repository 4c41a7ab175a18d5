//! Wishlists

pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::WishlistsServiceError;
pub use service::*;
