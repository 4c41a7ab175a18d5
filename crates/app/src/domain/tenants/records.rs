//! Tenant Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

pub type TenantUuid = TypedUuid<TenantRecord>;

/// An isolated storefront. Every tenant-owned row carries its UUID.
#[derive(Debug, Clone)]
pub struct TenantRecord {
    pub uuid: TenantUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl TenantRecord {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
