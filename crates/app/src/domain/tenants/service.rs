//! Tenants service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::tenants::{
    data::NewTenant,
    errors::TenantsServiceError,
    records::{TenantRecord, TenantUuid},
    repository::PgTenantsRepository,
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    repository: PgTenantsRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgTenantsRepository::new(pool),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    async fn create_tenant(
        &self,
        mut tenant: NewTenant,
    ) -> Result<TenantRecord, TenantsServiceError> {
        let name = tenant.name.trim();

        if name.is_empty() {
            return Err(TenantsServiceError::MissingRequiredData);
        }

        tenant.name = name.to_owned();

        Ok(self.repository.create_tenant(tenant).await?)
    }

    async fn get_tenant(&self, tenant: TenantUuid) -> Result<TenantRecord, TenantsServiceError> {
        Ok(self.repository.get_tenant(tenant).await?)
    }

    async fn list_tenants(&self) -> Result<Vec<TenantRecord>, TenantsServiceError> {
        Ok(self.repository.list_tenants().await?)
    }
}

/// Storefront provisioning.
#[automock]
#[async_trait]
pub trait TenantsService: Send + Sync {
    /// Creates a storefront. The name is trimmed and must not be blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the tenant cannot be stored.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError>;

    /// Fetches a live storefront; soft-deleted tenants are `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns [`TenantsServiceError::NotFound`] if there is no such live tenant.
    async fn get_tenant(&self, tenant: TenantUuid) -> Result<TenantRecord, TenantsServiceError>;

    /// Live storefronts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn list_tenants(&self) -> Result<Vec<TenantRecord>, TenantsServiceError>;
}
