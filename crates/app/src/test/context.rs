//! Test context for service-level integration tests.

use once_cell::sync::Lazy;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::{
    database::{self, Db},
    domain::{
        addresses::PgAddressesService,
        carts::PgCartsService,
        orders::PgOrdersService,
        products::PgProductsService,
        tenants::{PgTenantsService, TenantsService, data::NewTenant, records::TenantUuid},
        wishlists::PgWishlistsService,
    },
};

use super::db::{SUPERUSER, SUPERUSER_PASSWORD, TestDb};

/// Login role the services connect as. Superusers bypass RLS, so tests must not.
const APP_ROLE: &str = "bazaar_app_test";
const APP_ROLE_PASSWORD: &str = "bazaar_app_test_password";

/// Role DDL is server-wide; concurrent `ALTER ROLE`s on one role conflict.
static ROLE_SETUP: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub struct TestContext {
    pub db: TestDb,
    pub tenant_uuid: TenantUuid,
    pub products: PgProductsService,
    pub addresses: PgAddressesService,
    pub carts: PgCartsService,
    pub wishlists: PgWishlistsService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;

        let db = Db::new(Self::app_pool(&test_db).await);

        let tenant_uuid = Self::insert_tenant(&test_db, "Test Tenant").await;

        Self {
            products: PgProductsService::new(db.clone()),
            addresses: PgAddressesService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            wishlists: PgWishlistsService::new(db.clone()),
            orders: PgOrdersService::new(db),
            tenant_uuid,
            db: test_db,
        }
    }

    /// Create an additional tenant for isolation tests.
    pub async fn create_tenant(&self, name: &str) -> TenantUuid {
        Self::insert_tenant(&self.db, name).await
    }

    async fn insert_tenant(test_db: &TestDb, name: &str) -> TenantUuid {
        let tenant = PgTenantsService::new(test_db.pool().clone())
            .create_tenant(NewTenant::new(name))
            .await
            .expect("Failed to create test tenant");

        tenant.uuid
    }

    async fn app_pool(test_db: &TestDb) -> PgPool {
        {
            let _guard = ROLE_SETUP.lock().await;

            database::ensure_app_role(test_db.pool(), APP_ROLE, APP_ROLE_PASSWORD)
                .await
                .expect("Failed to provision app role");
        }

        let app_url = test_db.superuser_url.replacen(
            &format!("{SUPERUSER}:{SUPERUSER_PASSWORD}"),
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        let pool = PgPool::connect(&app_url)
            .await
            .expect("Failed to create app pool");

        assert!(
            !database::role_bypasses_rls(&pool)
                .await
                .expect("Failed to read role attributes"),
            "test services must not bypass row-level security"
        );

        pool
    }
}
