//! Authentication

pub(crate) mod middleware;

pub(crate) use middleware::{require_admin, require_customer};
