//! Cart Data

use crate::domain::{carts::records::SelectedOptions, products::records::ProductUuid};

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u64,
    pub selected_options: SelectedOptions,
}

impl NewCartItem {
    #[must_use]
    pub fn new(product_uuid: ProductUuid, quantity: u64) -> Self {
        Self {
            product_uuid,
            quantity,
            selected_options: SelectedOptions::new(),
        }
    }
}
