//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    pub image: Option<String>,
    /// Unit price in minor units.
    pub price: u64,
    pub stock: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// A product can be bought while it is live and has stock left.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.deleted_at.is_none() && self.stock > 0
    }

    /// Whether `quantity` units can be taken from current stock.
    #[must_use]
    pub fn has_stock_for(&self, quantity: u64) -> bool {
        self.deleted_at.is_none() && self.stock >= quantity
    }
}
