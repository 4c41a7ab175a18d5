//! Wishlist Handlers

pub(crate) mod add;
pub(crate) mod check;
pub(crate) mod clear;
pub(crate) mod count;
pub(crate) mod get;
pub(crate) mod move_to_cart;
pub(crate) mod remove;
