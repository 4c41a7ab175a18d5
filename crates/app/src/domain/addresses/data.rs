//! Address Data

use crate::domain::addresses::records::{AddressLabel, AddressUuid};

/// New Address Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub label: AddressLabel,
    pub address: String,
    pub country: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_no: String,
    /// Ignored for a user's first address, which always becomes the default.
    pub is_default: bool,
}

/// Address Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct AddressUpdate {
    pub label: AddressLabel,
    pub address: String,
    pub country: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_no: String,
    /// `Some(true)` promotes the address; `Some(false)` never demotes the current default.
    pub is_default: Option<bool>,
}
