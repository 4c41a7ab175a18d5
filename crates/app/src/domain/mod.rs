//! Bazaar Domain Concerns

pub mod addresses;
pub mod carts;
pub mod orders;
pub mod products;
pub mod tenants;
pub mod users;
pub mod wishlists;
