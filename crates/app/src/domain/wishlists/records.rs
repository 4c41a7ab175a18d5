//! Wishlist Records

use jiff::Timestamp;

use crate::{
    domain::{carts::records::CartRecord, products::records::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Wishlist UUID
pub type WishlistUuid = TypedUuid<WishlistRecord>;

/// Wishlist Item UUID
pub type WishlistItemUuid = TypedUuid<WishlistItemRecord>;

/// Wishlist Record
#[derive(Debug, Clone)]
pub struct WishlistRecord {
    pub uuid: WishlistUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<WishlistItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WishlistRecord {
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn contains(&self, product: ProductUuid) -> bool {
        self.items.iter().any(|item| item.product_uuid == product)
    }
}

/// Wishlist Item Record
///
/// Product fields are a snapshot taken when the item was added or last refreshed.
#[derive(Debug, Clone)]
pub struct WishlistItemRecord {
    pub uuid: WishlistItemUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub product_price: u64,
    pub product_image: Option<String>,
    pub product_sku: String,
    pub is_available: bool,
    pub added_at: Timestamp,
}

/// Both aggregates after moving a product from the wishlist into the cart.
#[derive(Debug, Clone)]
pub struct MovedToCart {
    pub wishlist: WishlistRecord,
    pub cart: CartRecord,
}
