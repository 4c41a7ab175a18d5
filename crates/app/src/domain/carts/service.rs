//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartRecord, CartUuid, Coupon},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        tenants::records::TenantUuid,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Adds a line to the user's cart inside an open transaction, creating the cart if needed.
    pub(crate) async fn add_item_in_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: &NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let product = self.stocked_product(tx, item).await?;

        let cart = self.carts_repository.find_or_create_cart(tx, user).await?;

        self.items_repository
            .add_item(tx, cart.uuid, &product, item)
            .await?;

        self.carts_repository.touch_cart(tx, cart.uuid).await?;

        self.current_cart(tx, user).await
    }

    /// Removes every line and the coupon from the user's cart.
    ///
    /// Returns `false` when the user has no live cart.
    pub(crate) async fn clear_cart_in_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<bool, CartsServiceError> {
        let Some(cart) = self.carts_repository.find_cart(tx, user).await? else {
            return Ok(false);
        };

        self.items_repository.clear_items(tx, cart.uuid).await?;
        self.carts_repository.set_coupon(tx, cart.uuid, None).await?;

        Ok(true)
    }

    /// Looks up the product for `item` and checks the requested quantity against its stock.
    async fn stocked_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &NewCartItem,
    ) -> Result<ProductRecord, CartsServiceError> {
        let product = self
            .products_repository
            .find_product(tx, item.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        if !product.has_stock_for(item.quantity) {
            return Err(CartsServiceError::InsufficientStock {
                requested: item.quantity,
                available: product.stock,
            });
        }

        Ok(product)
    }

    async fn existing_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        self.carts_repository
            .find_cart(tx, user)
            .await?
            .ok_or(CartsServiceError::CartNotFound)
    }

    /// Reloads the user's cart with refreshed line snapshots.
    async fn current_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let cart = self.existing_cart(tx, user).await?;

        self.with_items(tx, cart).await
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut cart: CartRecord,
    ) -> Result<CartRecord, CartsServiceError> {
        self.items_repository
            .refresh_item_snapshots(tx, cart.uuid)
            .await?;

        cart.items = self.items_repository.list_items(tx, cart.uuid).await?;

        Ok(cart)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self
            .carts_repository
            .find_or_create_cart(&mut tx, user)
            .await?;

        let cart = self.with_items(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            tenant_uuid = %tenant,
            user_uuid = %user,
            product_uuid = %item.product_uuid,
            quantity = item.quantity
        ),
        err
    )]
    async fn add_item(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.add_item_in_transaction(&mut tx, user, &item).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn update_item_quantity(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.current_cart(&mut tx, user).await?;

        let line = cart
            .item(item.product_uuid)
            .ok_or(CartsServiceError::ItemNotFound)?;

        let product = self.stocked_product(&mut tx, &item).await?;

        // Quantity updates keep the options picked when the line was added.
        let item = NewCartItem {
            selected_options: line.selected_options.clone(),
            ..item
        };

        self.items_repository
            .put_item(&mut tx, cart.uuid, &product, &item)
            .await?;

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        let cart = self.current_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.existing_cart(&mut tx, user).await?;

        let rows_affected = self
            .items_repository
            .remove_item(&mut tx, cart.uuid, product)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        let cart = self.current_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        if !self.clear_cart_in_transaction(&mut tx, user).await? {
            return Err(CartsServiceError::CartNotFound);
        }

        let cart = self.current_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn apply_coupon(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        coupon: Coupon,
    ) -> Result<CartRecord, CartsServiceError> {
        if !coupon.is_valid() {
            return Err(CartsServiceError::InvalidCoupon);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.existing_cart(&mut tx, user).await?;

        self.carts_repository
            .set_coupon(&mut tx, cart.uuid, Some(&coupon))
            .await?;

        let cart = self.current_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_coupon(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.existing_cart(&mut tx, user).await?;

        self.carts_repository
            .set_coupon(&mut tx, cart.uuid, None)
            .await?;

        let cart = self.current_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn count_items(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let count = self.carts_repository.count_cart_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(count)
    }

    #[tracing::instrument(
        name = "carts.service.merge_guest_cart",
        skip(self),
        fields(
            tenant_uuid = %tenant,
            user_uuid = %user,
            guest_user_uuid = %guest_user,
            guest_cart_uuid = %guest
        ),
        err
    )]
    async fn merge_guest_cart(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        guest_user: UserUuid,
        guest: CartUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        if guest_user == user {
            return Err(CartsServiceError::InvalidGuestCart);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        // A cart uuid alone is not enough; the caller must also name its owner.
        let guest_cart = self
            .carts_repository
            .find_cart_by_uuid(&mut tx, guest)
            .await?
            .filter(|cart| cart.user_uuid == guest_user)
            .ok_or(CartsServiceError::CartNotFound)?;

        let cart = self
            .carts_repository
            .find_or_create_cart(&mut tx, user)
            .await?;

        let cart = self.with_items(&mut tx, cart).await?;

        let guest_items = self.items_repository.list_items(&mut tx, guest_cart.uuid).await?;

        let mut merged = 0_usize;

        for guest_item in guest_items {
            let product = self
                .products_repository
                .find_product(&mut tx, guest_item.product_uuid)
                .await?;

            let Some(product) = product.filter(ProductRecord::is_available) else {
                debug!(product_uuid = %guest_item.product_uuid, "skipping unavailable guest line");

                continue;
            };

            let existing = cart
                .item(product.uuid)
                .map_or(0, |item| item.quantity);

            let quantity = existing
                .saturating_add(guest_item.quantity)
                .min(product.stock);

            let item = NewCartItem {
                product_uuid: product.uuid,
                quantity,
                selected_options: guest_item.selected_options,
            };

            self.items_repository
                .put_item(&mut tx, cart.uuid, &product, &item)
                .await?;

            merged += 1;
        }

        self.carts_repository.delete_cart(&mut tx, guest_cart.uuid).await?;
        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        let cart = self.current_cart(&mut tx, user).await?;

        tx.commit().await?;

        info!(merged, "merged guest cart");

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Returns the user's cart, creating an empty one on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded or created.
    async fn get_cart(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Adds `item.quantity` units of a product, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing or unavailable, or stock is insufficient.
    async fn add_item(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Sets the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::ItemNotFound`] if the product is not in the cart.
    async fn update_item_quantity(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Removes a product's line.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::ItemNotFound`] if the product is not in the cart.
    async fn remove_item(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Removes every line and the coupon.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::CartNotFound`] if the user has no cart.
    async fn clear_cart(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Stores a coupon on the cart, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidCoupon`] for an out-of-range discount.
    async fn apply_coupon(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        coupon: Coupon,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Drops the cart's coupon.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::CartNotFound`] if the user has no cart.
    async fn remove_coupon(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Total units in the user's cart. Never creates a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn count_items(&self, tenant: TenantUuid, user: UserUuid)
    -> Result<u64, CartsServiceError>;

    /// Folds a guest session's cart into this user's cart and retires it.
    ///
    /// The guest cart must belong to `guest_user`, otherwise it is reported as
    /// not found.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidGuestCart`] when the guest is the caller.
    async fn merge_guest_cart(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        guest_user: UserUuid,
        guest: CartUuid,
    ) -> Result<CartRecord, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::carts::records::DiscountType,
        test::{TestContext, helpers::create_product},
    };

    use super::*;

    fn coupon(discount_type: DiscountType, discount_amount: u64) -> Coupon {
        Coupon {
            code: "WELCOME".to_string(),
            discount_amount,
            discount_type,
        }
    }

    #[tokio::test]
    async fn get_cart_creates_a_single_cart_per_user() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = ctx.carts.get_cart(ctx.tenant_uuid, user).await?;
        let second = ctx.carts.get_cart(ctx.tenant_uuid, user).await?;

        assert_eq!(first.uuid, second.uuid);
        assert!(first.items.is_empty());
        assert_eq!(first.total(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_get_cart_converges_on_one_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let (first, second) = tokio::join!(
            ctx.carts.get_cart(ctx.tenant_uuid, user),
            ctx.carts.get_cart(ctx.tenant_uuid, user),
        );

        assert_eq!(first?.uuid, second?.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn adding_items_keeps_totals_consistent() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let widget = create_product(&ctx, 250, 10).await?;
        let gadget = create_product(&ctx, 1_000, 10).await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(widget.uuid, 2))
            .await?;

        let cart = ctx
            .carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(gadget.uuid, 1))
            .await?;

        assert_eq!(cart.items.len(), 2);

        for item in &cart.items {
            assert_eq!(item.total_price(), item.unit_price * item.quantity);
        }

        assert_eq!(cart.subtotal(), 1_500);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total(), 1_500);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_product_twice_adds_quantities() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let product = create_product(&ctx, 100, 5).await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 3))
            .await?;

        let cart = ctx
            .carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 3))
            .await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item(product.uuid).map(|item| item.quantity), Some(6));

        Ok(())
    }

    #[tokio::test]
    async fn adding_more_than_stock_is_rejected_without_changes() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let product = create_product(&ctx, 100, 5).await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 1))
            .await?;

        let result = ctx
            .carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 6))
            .await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    requested: 6,
                    available: 5
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, user).await?;

        assert_eq!(cart.item(product.uuid).map(|item| item.quantity), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn adding_unknown_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                UserUuid::new(),
                NewCartItem::new(ProductUuid::new(), 1),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let product = create_product(&ctx, 100, 5).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                UserUuid::new(),
                NewCartItem::new(product.uuid, 0),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_overwrites_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let product = create_product(&ctx, 100, 5).await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 3))
            .await?;

        let cart = ctx
            .carts
            .update_item_quantity(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 2))
            .await?;

        assert_eq!(cart.item(product.uuid).map(|item| item.quantity), Some(2));
        assert_eq!(cart.subtotal(), 200);

        let result = ctx
            .carts
            .update_item_quantity(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 9))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_without_cart_or_line_fails() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let product = create_product(&ctx, 100, 5).await?;
        let other = create_product(&ctx, 100, 5).await?;

        let result = ctx
            .carts
            .update_item_quantity(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 1))
            .await?;

        let result = ctx
            .carts
            .update_item_quantity(ctx.tenant_uuid, user, NewCartItem::new(other.uuid, 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_deletes_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let product = create_product(&ctx, 100, 5).await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 1))
            .await?;

        let cart = ctx
            .carts
            .remove_item(ctx.tenant_uuid, user, product.uuid)
            .await?;

        assert!(cart.items.is_empty());

        let result = ctx
            .carts
            .remove_item(ctx.tenant_uuid, user, product.uuid)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn coupons_discount_the_total_and_clear_removes_them() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let product = create_product(&ctx, 1_000, 5).await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 2))
            .await?;

        let cart = ctx
            .carts
            .apply_coupon(ctx.tenant_uuid, user, coupon(DiscountType::Percentage, 25))
            .await?;

        assert_eq!(cart.discount(), 500);
        assert_eq!(cart.total(), 1_500);

        let cart = ctx.carts.remove_coupon(ctx.tenant_uuid, user).await?;

        assert!(cart.coupon.is_none());
        assert_eq!(cart.total(), 2_000);

        ctx.carts
            .apply_coupon(ctx.tenant_uuid, user, coupon(DiscountType::Fixed, 300))
            .await?;

        let cart = ctx.carts.clear_cart(ctx.tenant_uuid, user).await?;

        assert!(cart.items.is_empty());
        assert!(cart.coupon.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_coupon_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.carts.get_cart(ctx.tenant_uuid, user).await?;

        let result = ctx
            .carts
            .apply_coupon(ctx.tenant_uuid, user, coupon(DiscountType::Percentage, 150))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidCoupon)),
            "expected InvalidCoupon, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn coupon_operations_require_a_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let result = ctx
            .carts
            .apply_coupon(ctx.tenant_uuid, user, coupon(DiscountType::Fixed, 100))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        let result = ctx.carts.clear_cart(ctx.tenant_uuid, user).await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn count_items_does_not_create_a_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        assert_eq!(ctx.carts.count_items(ctx.tenant_uuid, user).await?, 0);

        let result = ctx.carts.remove_coupon(ctx.tenant_uuid, user).await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "count should not have created a cart, got {result:?}"
        );

        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(product.uuid, 4))
            .await?;

        assert_eq!(ctx.carts.count_items(ctx.tenant_uuid, user).await?, 4);

        Ok(())
    }

    #[tokio::test]
    async fn merge_guest_cart_sums_and_clamps_quantities() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let guest = UserUuid::new();

        let shared = create_product(&ctx, 100, 5).await?;
        let guest_only = create_product(&ctx, 200, 5).await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, user, NewCartItem::new(shared.uuid, 3))
            .await?;

        ctx.carts
            .add_item(ctx.tenant_uuid, guest, NewCartItem::new(shared.uuid, 4))
            .await?;

        let guest_cart = ctx
            .carts
            .add_item(ctx.tenant_uuid, guest, NewCartItem::new(guest_only.uuid, 1))
            .await?;

        let cart = ctx
            .carts
            .merge_guest_cart(ctx.tenant_uuid, user, guest, guest_cart.uuid)
            .await?;

        assert_eq!(cart.item(shared.uuid).map(|item| item.quantity), Some(5));
        assert_eq!(cart.item(guest_only.uuid).map(|item| item.quantity), Some(1));

        // The guest cart is retired, so the guest starts over.
        let fresh = ctx.carts.get_cart(ctx.tenant_uuid, guest).await?;

        assert_ne!(fresh.uuid, guest_cart.uuid);
        assert!(fresh.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn merging_own_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, user).await?;

        let result = ctx
            .carts
            .merge_guest_cart(ctx.tenant_uuid, user, user, cart.uuid)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidGuestCart)),
            "expected InvalidGuestCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn merging_requires_the_guest_cart_owner() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let guest = UserUuid::new();
        let product = create_product(&ctx, 100, 5).await?;

        let guest_cart = ctx
            .carts
            .add_item(ctx.tenant_uuid, guest, NewCartItem::new(product.uuid, 2))
            .await?;

        let result = ctx
            .carts
            .merge_guest_cart(ctx.tenant_uuid, user, UserUuid::new(), guest_cart.uuid)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        let untouched = ctx.carts.get_cart(ctx.tenant_uuid, guest).await?;

        assert_eq!(untouched.uuid, guest_cart.uuid, "guest cart should survive");
        assert_eq!(
            untouched.item(product.uuid).map(|item| item.quantity),
            Some(2),
            "guest lines should be left in place"
        );
        assert_eq!(
            ctx.carts.count_items(ctx.tenant_uuid, user).await?,
            0,
            "caller's cart should not gain guest lines"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cart_not_visible_to_other_tenant() -> TestResult {
        let ctx = TestContext::new().await;
        let other_tenant = ctx.create_tenant("Other").await;
        let guest = UserUuid::new();

        let guest_cart = ctx.carts.get_cart(ctx.tenant_uuid, guest).await?;

        let result = ctx
            .carts
            .merge_guest_cart(other_tenant, UserUuid::new(), guest, guest_cart.uuid)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        let product = create_product(&ctx, 100, 5).await?;

        let result = ctx
            .carts
            .add_item(other_tenant, guest, NewCartItem::new(product.uuid, 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }
}
