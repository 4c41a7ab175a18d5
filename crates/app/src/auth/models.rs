//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    auth::ApiTokenVersion,
    domain::{tenants::records::TenantUuid, users::UserUuid},
};

/// Who a request acts as once its bearer token checks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub tenant: TenantUuid,

    /// Set for customer tokens; `None` for tenant admin tokens.
    pub user: Option<UserUuid>,
}

impl Principal {
    #[must_use]
    pub const fn admin(tenant: TenantUuid) -> Self {
        Self { tenant, user: None }
    }

    #[must_use]
    pub const fn customer(tenant: TenantUuid, user: UserUuid) -> Self {
        Self {
            tenant,
            user: Some(user),
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.user.is_none()
    }
}

/// API token data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    pub tenant_uuid: TenantUuid,
    pub user_uuid: Option<UserUuid>,
    pub version: ApiTokenVersion,

    /// Peppered HMAC-SHA256 verifier for the token secret material.
    pub token_hash: String,
}

/// API token metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct ApiTokenMetadata {
    pub uuid: Uuid,
    pub tenant_uuid: TenantUuid,
    pub user_uuid: Option<UserUuid>,
    pub version: ApiTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New API token persistence payload.
#[derive(Debug, Clone)]
pub struct NewApiToken {
    pub uuid: Uuid,
    pub tenant_uuid: TenantUuid,
    pub user_uuid: Option<UserUuid>,
    pub version: ApiTokenVersion,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

/// API token issuance result with one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub metadata: ApiTokenMetadata,
}
