//! Order Data

use jiff::Timestamp;
use thiserror::Error;

use crate::domain::{
    orders::records::{OrderAddress, OrderStatus, OrderUuid, PaymentMethod, PaymentStatus},
    products::records::ProductUuid,
    users::UserUuid,
};

/// New Order Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_uuid: ProductUuid,
    pub title: String,
    pub image: Option<String>,
    pub price: u64,
    pub quantity: u64,
    pub total_price: u64,
}

/// New Order Data
///
/// Totals are supplied by the client and only checked for consistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<NewOrderItem>,
    pub shipping_address: OrderAddress,
    pub billing_address: OrderAddress,
    pub payment_method: PaymentMethod,
    pub subtotal: u64,
    pub tax: u64,
    pub discount: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub notes: Option<String>,
    /// Empty the customer's cart in the same transaction.
    pub clear_cart: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TotalsMismatch {
    #[error("order has no items")]
    Empty,

    #[error("item {position} total_price must equal price * quantity")]
    ItemTotal { position: usize },

    #[error("subtotal {actual} does not match item totals {expected}")]
    Subtotal { expected: u64, actual: u64 },

    #[error("total {actual} does not match subtotal + tax + shipping_cost - discount = {expected}")]
    Total { expected: u64, actual: u64 },

    #[error("order amounts overflow")]
    Overflow,
}

impl NewOrder {
    /// Checks that the client-supplied amounts add up.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn check_totals(&self) -> Result<(), TotalsMismatch> {
        if self.items.is_empty() {
            return Err(TotalsMismatch::Empty);
        }

        let mut expected_subtotal = 0_u64;

        for (position, item) in self.items.iter().enumerate() {
            let line_total = item
                .price
                .checked_mul(item.quantity)
                .ok_or(TotalsMismatch::Overflow)?;

            if line_total != item.total_price {
                return Err(TotalsMismatch::ItemTotal { position });
            }

            expected_subtotal = expected_subtotal
                .checked_add(line_total)
                .ok_or(TotalsMismatch::Overflow)?;
        }

        if expected_subtotal != self.subtotal {
            return Err(TotalsMismatch::Subtotal {
                expected: expected_subtotal,
                actual: self.subtotal,
            });
        }

        let expected_total = self
            .subtotal
            .checked_add(self.tax)
            .and_then(|amount| amount.checked_add(self.shipping_cost))
            .ok_or(TotalsMismatch::Overflow)?
            // A discount larger than everything else can never balance.
            .checked_sub(self.discount)
            .ok_or(TotalsMismatch::Total {
                expected: 0,
                actual: self.total,
            })?;

        if expected_total != self.total {
            return Err(TotalsMismatch::Total {
                expected: expected_total,
                actual: self.total,
            });
        }

        Ok(())
    }
}

/// Admin status change. Optional fields are left untouched when `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatusUpdate {
    pub order_status: OrderStatus,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<Timestamp>,
}

impl OrderStatusUpdate {
    #[must_use]
    pub fn new(order_status: OrderStatus) -> Self {
        Self {
            order_status,
            payment_status: None,
            tracking_number: None,
            estimated_delivery: None,
        }
    }
}

/// Narrows an order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderFilter {
    /// Restrict to one customer's orders.
    pub user: Option<UserUuid>,
    pub status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> OrderAddress {
        OrderAddress {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 St James's Square".to_string(),
            country: "GB".to_string(),
            mobile_no: "+447700900000".to_string(),
        }
    }

    fn order(items: Vec<NewOrderItem>, subtotal: u64, total: u64) -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            items,
            shipping_address: address(),
            billing_address: address(),
            payment_method: PaymentMethod::CreditCard,
            subtotal,
            tax: 0,
            discount: 0,
            shipping_cost: 0,
            total,
            notes: None,
            clear_cart: true,
        }
    }

    fn item(price: u64, quantity: u64, total_price: u64) -> NewOrderItem {
        NewOrderItem {
            product_uuid: ProductUuid::new(),
            title: "Widget".to_string(),
            image: Some("/i.jpg".to_string()),
            price,
            quantity,
            total_price,
        }
    }

    #[test]
    fn consistent_order_passes() {
        assert_eq!(order(vec![item(10, 2, 20)], 20, 20).check_totals(), Ok(()));
    }

    #[test]
    fn tax_shipping_and_discount_are_applied() {
        let mut order = order(vec![item(500, 2, 1_000), item(250, 1, 250)], 1_250, 1_350);

        order.tax = 100;
        order.shipping_cost = 200;
        order.discount = 200;

        assert_eq!(order.check_totals(), Ok(()));
    }

    #[test]
    fn empty_order_is_rejected() {
        assert_eq!(order(vec![], 0, 0).check_totals(), Err(TotalsMismatch::Empty));
    }

    #[test]
    fn wrong_line_total_is_rejected() {
        let order = order(vec![item(10, 2, 20), item(10, 3, 20)], 40, 40);

        assert_eq!(
            order.check_totals(),
            Err(TotalsMismatch::ItemTotal { position: 1 })
        );
    }

    #[test]
    fn wrong_subtotal_is_rejected() {
        assert_eq!(
            order(vec![item(10, 2, 20)], 25, 25).check_totals(),
            Err(TotalsMismatch::Subtotal {
                expected: 20,
                actual: 25
            })
        );
    }

    #[test]
    fn wrong_total_is_rejected() {
        assert_eq!(
            order(vec![item(10, 2, 20)], 20, 19).check_totals(),
            Err(TotalsMismatch::Total {
                expected: 20,
                actual: 19
            })
        );
    }

    #[test]
    fn oversized_discount_is_rejected() {
        let mut order = order(vec![item(10, 1, 10)], 10, 0);

        order.discount = 11;

        assert!(matches!(
            order.check_totals(),
            Err(TotalsMismatch::Total { .. })
        ));
    }

    #[test]
    fn overflowing_line_is_rejected() {
        assert_eq!(
            order(vec![item(u64::MAX, 2, 0)], 0, 0).check_totals(),
            Err(TotalsMismatch::Overflow)
        );
    }
}
