//! Tenant Data

use crate::domain::tenants::records::TenantUuid;

/// A storefront to provision.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    pub uuid: TenantUuid,
    pub name: String,
}

impl NewTenant {
    /// New storefront with a generated UUID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: TenantUuid::new(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_uuid(mut self, uuid: TenantUuid) -> Self {
        self.uuid = uuid;
        self
    }
}
