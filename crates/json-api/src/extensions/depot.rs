//! Depot helper extensions.

use std::any::Any;

use bazaar_app::{
    auth::Principal,
    domain::{tenants::records::TenantUuid, users::UserUuid},
};
use salvo::prelude::{Depot, StatusError};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    fn principal_or_401(&self) -> Result<Principal, StatusError>;

    /// Tenant and user of a customer token.
    fn customer_or_403(&self) -> Result<(TenantUuid, UserUuid), StatusError>;

    /// Tenant of an admin token.
    fn admin_or_403(&self) -> Result<TenantUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<Principal, StatusError> {
        self.obtain::<Principal>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }

    fn customer_or_403(&self) -> Result<(TenantUuid, UserUuid), StatusError> {
        let principal = self.principal_or_401()?;

        principal
            .user
            .map(|user| (principal.tenant, user))
            .ok_or_else(|| StatusError::forbidden().brief("Customer token required"))
    }

    fn admin_or_403(&self) -> Result<TenantUuid, StatusError> {
        let principal = self.principal_or_401()?;

        if principal.is_admin() {
            Ok(principal.tenant)
        } else {
            Err(StatusError::forbidden().brief("Admin token required"))
        }
    }
}
