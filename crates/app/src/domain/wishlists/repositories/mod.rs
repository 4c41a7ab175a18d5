//! Wishlist Repositories

mod items;
mod wishlists;

pub(crate) use items::PgWishlistItemsRepository;
pub(crate) use wishlists::PgWishlistsRepository;
