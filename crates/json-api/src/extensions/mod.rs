//! Extension traits

mod depot;
mod result;
mod validate;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use validate::ValidateExt as _;
