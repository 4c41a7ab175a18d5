//! Cart Records

use std::{collections::BTreeMap, fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{products::records::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Variant choices (size, colour, ...) picked for a cart line.
pub type SelectedOptions = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown discount type: {0}")]
pub struct UnknownDiscountType(String);

impl FromStr for DiscountType {
    type Err = UnknownDiscountType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(UnknownDiscountType(value.to_string())),
        }
    }
}

/// Coupon applied to a cart.
///
/// For [`DiscountType::Percentage`] the amount is a whole percentage; for
/// [`DiscountType::Fixed`] it is in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    pub code: String,
    pub discount_amount: u64,
    pub discount_type: DiscountType,
}

impl Coupon {
    /// Whether the coupon can be stored on a cart.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.code.trim().is_empty()
            && match self.discount_type {
                DiscountType::Percentage => (1..=100).contains(&self.discount_amount),
                DiscountType::Fixed => self.discount_amount > 0,
            }
    }

    /// Discount this coupon takes off `subtotal`, never more than the subtotal itself.
    #[must_use]
    pub fn discount_for(&self, subtotal: u64) -> u64 {
        match self.discount_type {
            DiscountType::Percentage => {
                let percent = u128::from(self.discount_amount.min(100));

                u64::try_from(u128::from(subtotal) * percent / 100).unwrap_or(subtotal)
            }
            DiscountType::Fixed => self.discount_amount.min(subtotal),
        }
    }
}

/// Cart Record
///
/// Totals are derived from the lines on every read rather than stored.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub coupon: Option<Coupon>,
    pub items: Vec<CartItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .map(CartItemRecord::total_price)
            .fold(0, u64::saturating_add)
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items
            .iter()
            .map(|item| item.quantity)
            .fold(0, u64::saturating_add)
    }

    #[must_use]
    pub fn discount(&self) -> u64 {
        self.coupon
            .as_ref()
            .map_or(0, |coupon| coupon.discount_for(self.subtotal()))
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.subtotal() - self.discount()
    }

    #[must_use]
    pub fn item(&self, product: ProductUuid) -> Option<&CartItemRecord> {
        self.items.iter().find(|item| item.product_uuid == product)
    }
}

/// Cart Item Record
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u64,
    /// Product price when the line was last refreshed.
    pub unit_price: u64,
    pub is_available: bool,
    pub stock_available: u64,
    pub selected_options: SelectedOptions,
    pub added_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItemRecord {
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_price: u64, quantity: u64) -> CartItemRecord {
        CartItemRecord {
            uuid: CartItemUuid::new(),
            product_uuid: ProductUuid::new(),
            quantity,
            unit_price,
            is_available: true,
            stock_available: 100,
            selected_options: SelectedOptions::new(),
            added_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn cart(items: Vec<CartItemRecord>, coupon: Option<Coupon>) -> CartRecord {
        CartRecord {
            uuid: CartUuid::new(),
            user_uuid: UserUuid::new(),
            coupon,
            items,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn coupon(discount_type: DiscountType, discount_amount: u64) -> Coupon {
        Coupon {
            code: "SAVE".to_string(),
            discount_amount,
            discount_type,
        }
    }

    #[test]
    fn totals_are_derived_from_lines() {
        let cart = cart(vec![item(250, 2), item(1_000, 1)], None);

        assert_eq!(cart.subtotal(), 1_500);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.discount(), 0);
        assert_eq!(cart.total(), 1_500);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let cart = cart(vec![], Some(coupon(DiscountType::Fixed, 500)));

        assert_eq!(cart.subtotal(), 0);
        assert_eq!(cart.discount(), 0);
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn percentage_coupon_discounts_subtotal() {
        let cart = cart(vec![item(999, 2)], Some(coupon(DiscountType::Percentage, 10)));

        assert_eq!(cart.subtotal(), 1_998);
        assert_eq!(cart.discount(), 199);
        assert_eq!(cart.total(), 1_799);
    }

    #[test]
    fn fixed_coupon_never_exceeds_subtotal() {
        let cart = cart(vec![item(300, 1)], Some(coupon(DiscountType::Fixed, 500)));

        assert_eq!(cart.discount(), 300);
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn coupon_validation() {
        assert!(coupon(DiscountType::Percentage, 100).is_valid());
        assert!(!coupon(DiscountType::Percentage, 0).is_valid());
        assert!(!coupon(DiscountType::Percentage, 101).is_valid());
        assert!(coupon(DiscountType::Fixed, 1_000_000).is_valid());
        assert!(!coupon(DiscountType::Fixed, 0).is_valid());

        let blank = Coupon {
            code: "  ".to_string(),
            ..coupon(DiscountType::Fixed, 10)
        };

        assert!(!blank.is_valid());
    }

    #[test]
    fn discount_type_parses_storage_form() {
        assert_eq!(
            "percentage".parse::<DiscountType>().ok(),
            Some(DiscountType::Percentage)
        );
        assert_eq!("fixed".parse::<DiscountType>().ok(), Some(DiscountType::Fixed));
        assert!("bogus".parse::<DiscountType>().is_err());
    }
}
