//! Address Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod set_default;
pub(crate) mod update;
