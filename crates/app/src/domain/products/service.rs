//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        products::{
            data::{NewProduct, ProductUpdate},
            errors::ProductsServiceError,
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        tenant: TenantUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all live products.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn list_products(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::NotFound`] if there is no such live product.
    async fn get_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is invalid or cannot be stored.
    async fn create_product(
        &self,
        tenant: TenantUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces the editable fields of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::NotFound`] if there is no such live product.
    async fn update_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product with the given UUID.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::NotFound`] if there is no such live product.
    async fn delete_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_product};

    use super::*;

    #[tokio::test]
    async fn create_product_returns_product_details() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(
                ctx.tenant_uuid,
                NewProduct {
                    image: Some("/img/widget.jpg".to_string()),
                    ..new_product(uuid, 999, 4)
                },
            )
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, 999);
        assert_eq!(product.stock, 4);
        assert_eq!(product.image.as_deref(), Some("/img/widget.jpg"));
        assert!(product.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_product_returns_created_product() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(ctx.tenant_uuid, new_product(uuid, 1500, 1))
            .await?;

        let product = ctx.products.get_product(ctx.tenant_uuid, uuid).await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, 1500);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .get_product(ctx.tenant_uuid, ProductUuid::new())
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_returns_created_products() -> TestResult {
        let ctx = TestContext::new().await;

        let uuid_a = ProductUuid::new();
        let uuid_b = ProductUuid::new();

        ctx.products
            .create_product(ctx.tenant_uuid, new_product(uuid_a, 100, 1))
            .await?;

        ctx.products
            .create_product(ctx.tenant_uuid, new_product(uuid_b, 200, 1))
            .await?;

        let products = ctx.products.list_products(ctx.tenant_uuid).await?;

        let uuids: Vec<ProductUuid> = products.iter().map(|p| p.uuid).collect();

        assert_eq!(uuids, vec![uuid_a, uuid_b]);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_replaces_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(ctx.tenant_uuid, new_product(uuid, 500, 1))
            .await?;

        let updated = ctx
            .products
            .update_product(
                ctx.tenant_uuid,
                uuid,
                ProductUpdate {
                    name: "Renamed".to_string(),
                    sku: "REN-1".to_string(),
                    image: None,
                    price: 750,
                    stock: 12,
                },
            )
            .await?;

        assert_eq!(updated.uuid, uuid);
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.price, 750);
        assert_eq!(updated.stock, 12);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .update_product(
                ctx.tenant_uuid,
                ProductUuid::new(),
                ProductUpdate {
                    name: "Ghost".to_string(),
                    sku: "GHOST".to_string(),
                    image: None,
                    price: 100,
                    stock: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn delete_product_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(ctx.tenant_uuid, new_product(uuid, 300, 1))
            .await?;

        ctx.products.delete_product(ctx.tenant_uuid, uuid).await?;

        let result = ctx.products.get_product(ctx.tenant_uuid, uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        let listed = ctx.products.list_products(ctx.tenant_uuid).await?;

        assert!(
            !listed.iter().any(|p| p.uuid == uuid),
            "deleted product should not appear in list"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_twice_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(ctx.tenant_uuid, new_product(uuid, 300, 1))
            .await?;

        ctx.products.delete_product(ctx.tenant_uuid, uuid).await?;

        let result = ctx.products.delete_product(ctx.tenant_uuid, uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_product_duplicate_sku_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        let first = new_product(ProductUuid::new(), 100, 1);
        let second = NewProduct {
            sku: first.sku.clone(),
            ..new_product(ProductUuid::new(), 200, 1)
        };

        ctx.products.create_product(ctx.tenant_uuid, first).await?;

        let result = ctx.products.create_product(ctx.tenant_uuid, second).await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn product_not_visible_to_other_tenant() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .products
            .create_product(ctx.tenant_uuid, new_product(ProductUuid::new(), 100, 1))
            .await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = ctx.products.get_product(tenant_b, product.uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound for cross-tenant access, got {result:?}"
        );

        Ok(())
    }
}
