//! Order Handlers

pub(crate) mod bulk_status;
pub(crate) mod cancel;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod get_by_number;
pub(crate) mod index;
pub(crate) mod stats;
pub(crate) mod update_status;
