//! Order Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    domain::{products::records::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Returned,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }

    /// Customers may cancel until the order starts processing.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Cancelled and returned orders do not count towards spend.
    #[must_use]
    pub const fn counts_towards_spend(self) -> bool {
        !matches!(self, Self::Cancelled | Self::Returned)
    }

    /// Whether moving to `next` follows the usual fulfilment flow.
    #[must_use]
    pub const fn is_forward_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Delivered, Self::Returned) => true,
            (Self::Cancelled | Self::Returned, _)
            | (_, Self::Returned)
            | (Self::Delivered, Self::Cancelled) => false,
            (_, Self::Cancelled) => true,
            _ => next.stage() > self.stage(),
        }
    }

    const fn stage(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Confirmed => 1,
            Self::Processing => 2,
            Self::Shipped => 3,
            Self::Delivered => 4,
            Self::Cancelled | Self::Returned => 5,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownVariant::new("order status", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(UnknownVariant::new("payment status", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    CashOnDelivery,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Paypal => "paypal",
            Self::CashOnDelivery => "cash_on_delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "paypal" => Ok(Self::Paypal),
            "cash_on_delivery" => Ok(Self::CashOnDelivery),
            _ => Err(UnknownVariant::new("payment method", value)),
        }
    }
}

/// Address copied onto an order at checkout, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub country: String,
    pub mobile_no: String,
}

/// Order Record
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub order_number: Uuid,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderItemRecord>,
    pub shipping_address: OrderAddress,
    pub billing_address: OrderAddress,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub subtotal: u64,
    pub tax: u64,
    pub discount: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub notes: Option<String>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<Timestamp>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record
#[derive(Debug, Clone)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub title: String,
    pub image: Option<String>,
    pub price: u64,
    pub quantity: u64,
    pub total_price: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

/// Aggregate figures over a set of orders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderStats {
    pub total_orders: u64,
    /// Every status, in lifecycle order, including those with no orders.
    pub by_status: Vec<StatusCount>,
    pub total_spent: u64,
    /// Mean `total` over the orders counted in `total_spent`, rounded down.
    pub average_order_value: u64,
}

impl OrderStats {
    /// Builds stats from `(status, order count, sum of totals)` groups.
    #[must_use]
    pub fn from_groups(groups: &[(OrderStatus, u64, u64)]) -> Self {
        let by_status = OrderStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: groups
                    .iter()
                    .filter(|(group, _, _)| *group == status)
                    .map(|(_, count, _)| *count)
                    .fold(0, u64::saturating_add),
            })
            .collect();

        let total_orders = groups
            .iter()
            .map(|(_, count, _)| *count)
            .fold(0, u64::saturating_add);

        let (spending_orders, total_spent) = groups
            .iter()
            .filter(|(status, _, _)| status.counts_towards_spend())
            .fold((0_u64, 0_u64), |(orders, spent), (_, count, sum)| {
                (orders.saturating_add(*count), spent.saturating_add(*sum))
            });

        Self {
            total_orders,
            by_status,
            total_spent,
            average_order_value: total_spent.checked_div(spending_orders).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_and_confirmed_orders_can_be_cancelled() {
        let cancellable: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(|status| status.is_cancellable())
            .collect();

        assert_eq!(cancellable, vec![OrderStatus::Pending, OrderStatus::Confirmed]);
    }

    #[test]
    fn forward_transitions() {
        assert!(OrderStatus::Pending.is_forward_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.is_forward_to(OrderStatus::Delivered));
        assert!(OrderStatus::Processing.is_forward_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Delivered.is_forward_to(OrderStatus::Returned));

        assert!(!OrderStatus::Shipped.is_forward_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.is_forward_to(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.is_forward_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.is_forward_to(OrderStatus::Returned));
        assert!(!OrderStatus::Pending.is_forward_to(OrderStatus::Pending));
    }

    #[test]
    fn statuses_parse_their_storage_form() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().ok(), Some(status));
        }

        assert!("lost".parse::<OrderStatus>().is_err());
        assert_eq!(
            "cash_on_delivery".parse::<PaymentMethod>().ok(),
            Some(PaymentMethod::CashOnDelivery)
        );
        assert_eq!("paid".parse::<PaymentStatus>().ok(), Some(PaymentStatus::Paid));
    }

    #[test]
    fn stats_exclude_cancelled_and_returned_from_spend() {
        let stats = OrderStats::from_groups(&[
            (OrderStatus::Pending, 2, 3_000),
            (OrderStatus::Delivered, 1, 1_500),
            (OrderStatus::Cancelled, 4, 10_000),
            (OrderStatus::Returned, 1, 900),
        ]);

        assert_eq!(stats.total_orders, 8);
        assert_eq!(stats.total_spent, 4_500);
        assert_eq!(stats.average_order_value, 1_500);
        assert_eq!(stats.by_status.len(), OrderStatus::ALL.len());
        assert_eq!(
            stats.by_status.first(),
            Some(&StatusCount {
                status: OrderStatus::Pending,
                count: 2
            })
        );
    }

    #[test]
    fn stats_without_orders_are_zero() {
        let stats = OrderStats::from_groups(&[]);

        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.average_order_value, 0);
        assert!(stats.by_status.iter().all(|status| status.count == 0));
    }
}
