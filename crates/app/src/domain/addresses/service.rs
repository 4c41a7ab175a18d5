//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        addresses::{
            data::{AddressUpdate, NewAddress},
            errors::AddressesServiceError,
            records::{AddressRecord, AddressUuid},
            repository::PgAddressesRepository,
        },
        tenants::records::TenantUuid,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn list_addresses(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, AddressesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let addresses = self.repository.list_addresses(&mut tx, user).await?;

        tx.commit().await?;

        Ok(addresses)
    }

    async fn get_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let address = self.repository.get_address(&mut tx, user, address).await?;

        tx.commit().await?;

        Ok(address)
    }

    async fn create_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.lock_user_addresses(&mut tx, user).await?;

        let is_first = self.repository.count_addresses(&mut tx, user).await? == 0;
        let is_default = is_first || address.is_default;

        if is_default {
            self.repository.clear_default_address(&mut tx, user).await?;
        }

        let created = self
            .repository
            .create_address(&mut tx, user, &address, is_default)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: AddressUuid,
        update: AddressUpdate,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.lock_user_addresses(&mut tx, user).await?;

        let current = self.repository.get_address(&mut tx, user, address).await?;
        let promote = update.is_default == Some(true) && !current.is_default;

        if promote {
            self.repository.clear_default_address(&mut tx, user).await?;
        }

        let updated = self
            .repository
            .update_address(&mut tx, user, address, &update, current.is_default || promote)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.lock_user_addresses(&mut tx, user).await?;

        let current = self.repository.get_address(&mut tx, user, address).await?;

        let rows_affected = self
            .repository
            .delete_address(&mut tx, user, address)
            .await?;

        if rows_affected == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        if current.is_default {
            let promoted = self.repository.promote_oldest_address(&mut tx, user).await?;

            tracing::debug!(
                address_uuid = %address,
                promoted,
                "deleted default address"
            );
        }

        tx.commit().await?;

        Ok(())
    }

    async fn set_default_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.lock_user_addresses(&mut tx, user).await?;

        // Surface NotFound before touching the current default.
        self.repository.get_address(&mut tx, user, address).await?;

        self.repository.clear_default_address(&mut tx, user).await?;

        let updated = self
            .repository
            .set_default_address(&mut tx, user, address)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// Lists a user's live addresses, default first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn list_addresses(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, AddressesServiceError>;

    /// Retrieve a single address owned by the user.
    ///
    /// # Errors
    ///
    /// Returns [`AddressesServiceError::NotFound`] if the user has no such live address.
    async fn get_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Creates an address. A user's first address is always their default.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be stored.
    async fn create_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Replaces the editable fields of an address, optionally promoting it to default.
    ///
    /// # Errors
    ///
    /// Returns [`AddressesServiceError::NotFound`] if the user has no such live address.
    async fn update_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: AddressUuid,
        update: AddressUpdate,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Soft-deletes an address. Deleting the default promotes the oldest remaining address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressesServiceError::NotFound`] if the user has no such live address.
    async fn delete_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError>;

    /// Makes the address the user's only default.
    ///
    /// # Errors
    ///
    /// Returns [`AddressesServiceError::NotFound`] if the user has no such live address.
    async fn set_default_address(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::{Postgres, Transaction, query};
    use testresult::TestResult;

    use crate::{
        domain::addresses::records::AddressLabel,
        test::{TestContext, helpers::new_address},
    };

    use super::*;

    async fn defaults(
        ctx: &TestContext,
        user: UserUuid,
    ) -> Result<Vec<AddressUuid>, AddressesServiceError> {
        Ok(ctx
            .addresses
            .list_addresses(ctx.tenant_uuid, user)
            .await?
            .into_iter()
            .filter(|address| address.is_default)
            .map(|address| address.uuid)
            .collect())
    }

    #[tokio::test]
    async fn first_address_becomes_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let created = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        assert!(created.is_default, "first address should be the default");
        assert_eq!(created.label, AddressLabel::Home);

        Ok(())
    }

    #[tokio::test]
    async fn second_address_is_not_default_unless_requested() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let second = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        assert!(!second.is_default);
        assert_eq!(defaults(&ctx, user).await?, vec![first.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn creating_default_address_unsets_previous_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let second = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(true))
            .await?;

        assert_eq!(defaults(&ctx, user).await?, vec![second.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn set_default_moves_the_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let second = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let updated = ctx
            .addresses
            .set_default_address(ctx.tenant_uuid, user, second.uuid)
            .await?;

        assert!(updated.is_default);
        assert_eq!(defaults(&ctx, user).await?, vec![second.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn update_can_promote_but_not_demote_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let second = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let update = AddressUpdate {
            label: AddressLabel::Work,
            address: "1 Office Park".to_string(),
            country: "GB".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            mobile_no: "+447700900000".to_string(),
            is_default: Some(false),
        };

        let demoted = ctx
            .addresses
            .update_address(ctx.tenant_uuid, user, first.uuid, update.clone())
            .await?;

        assert!(demoted.is_default, "the only default must not be demoted");
        assert_eq!(demoted.label, AddressLabel::Work);
        assert_eq!(demoted.address, "1 Office Park");

        ctx.addresses
            .update_address(
                ctx.tenant_uuid,
                user,
                second.uuid,
                AddressUpdate {
                    is_default: Some(true),
                    ..update
                },
            )
            .await?;

        assert_eq!(defaults(&ctx, user).await?, vec![second.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn deleting_default_promotes_oldest_remaining_address() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let second = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        ctx.addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        ctx.addresses
            .delete_address(ctx.tenant_uuid, user, first.uuid)
            .await?;

        assert_eq!(defaults(&ctx, user).await?, vec![second.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn deleting_last_address_leaves_no_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let only = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        ctx.addresses
            .delete_address(ctx.tenant_uuid, user, only.uuid)
            .await?;

        assert!(defaults(&ctx, user).await?.is_empty());
        assert!(
            ctx.addresses
                .list_addresses(ctx.tenant_uuid, user)
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleting_non_default_keeps_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let second = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        ctx.addresses
            .delete_address(ctx.tenant_uuid, user, second.uuid)
            .await?;

        assert_eq!(defaults(&ctx, user).await?, vec![first.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn other_users_address_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = UserUuid::new();
        let intruder = UserUuid::new();

        let address = ctx
            .addresses
            .create_address(ctx.tenant_uuid, owner, new_address(false))
            .await?;

        let result = ctx
            .addresses
            .delete_address(ctx.tenant_uuid, intruder, address.uuid)
            .await;

        assert!(
            matches!(result, Err(AddressesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let result = ctx
            .addresses
            .set_default_address(ctx.tenant_uuid, intruder, address.uuid)
            .await;

        assert!(
            matches!(result, Err(AddressesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn address_not_visible_to_other_tenant() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let address = ctx
            .addresses
            .create_address(ctx.tenant_uuid, user, new_address(false))
            .await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = ctx.addresses.get_address(tenant_b, user, address.uuid).await;

        assert!(
            matches!(result, Err(AddressesServiceError::NotFound)),
            "expected NotFound for cross-tenant access, got {result:?}"
        );

        Ok(())
    }

    async fn short_lock_timeout(
        ctx: &TestContext,
        tenant: TenantUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = ctx.addresses.db.begin_tenant_transaction(tenant).await?;

        query("SET LOCAL lock_timeout = '200ms'")
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    #[tokio::test]
    async fn address_lock_is_scoped_to_the_tenant() -> TestResult {
        let ctx = TestContext::new().await;
        let tenant_b = ctx.create_tenant("Tenant B").await;
        let user = UserUuid::new();

        let mut held = ctx.addresses.db.begin_tenant_transaction(ctx.tenant_uuid).await?;

        ctx.addresses
            .repository
            .lock_user_addresses(&mut held, user)
            .await?;

        let mut same_tenant = short_lock_timeout(&ctx, ctx.tenant_uuid).await?;

        assert!(
            ctx.addresses
                .repository
                .lock_user_addresses(&mut same_tenant, user)
                .await
                .is_err(),
            "same tenant and user should wait on the held lock"
        );

        same_tenant.rollback().await?;

        let mut other_tenant = short_lock_timeout(&ctx, tenant_b).await?;

        ctx.addresses
            .repository
            .lock_user_addresses(&mut other_tenant, user)
            .await?;

        other_tenant.rollback().await?;
        held.rollback().await?;

        Ok(())
    }

    #[tokio::test]
    async fn mixed_operations_keep_exactly_one_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let mut created = Vec::new();

        for is_default in [false, true, false, true, false] {
            created.push(
                ctx.addresses
                    .create_address(ctx.tenant_uuid, user, new_address(is_default))
                    .await?
                    .uuid,
            );

            assert_eq!(defaults(&ctx, user).await?.len(), 1);
        }

        for address in created {
            ctx.addresses
                .delete_address(ctx.tenant_uuid, user, address)
                .await?;

            let remaining = ctx
                .addresses
                .list_addresses(ctx.tenant_uuid, user)
                .await?
                .len();

            assert_eq!(defaults(&ctx, user).await?.len(), remaining.min(1));
        }

        Ok(())
    }
}
