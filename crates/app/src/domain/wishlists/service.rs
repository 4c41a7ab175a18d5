//! Wishlists service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::{PgCartsService, data::NewCartItem},
        products::{records::ProductUuid, repository::PgProductsRepository},
        tenants::records::TenantUuid,
        users::UserUuid,
        wishlists::{
            errors::WishlistsServiceError,
            records::{MovedToCart, WishlistRecord},
            repositories::{PgWishlistItemsRepository, PgWishlistsRepository},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgWishlistsService {
    db: Db,
    wishlists_repository: PgWishlistsRepository,
    items_repository: PgWishlistItemsRepository,
    products_repository: PgProductsRepository,
    carts: PgCartsService,
}

impl PgWishlistsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            carts: PgCartsService::new(db.clone()),
            db,
            wishlists_repository: PgWishlistsRepository::new(),
            items_repository: PgWishlistItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn existing_wishlist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError> {
        let wishlist = self
            .wishlists_repository
            .find_wishlist(tx, user)
            .await?
            .ok_or(WishlistsServiceError::WishlistNotFound)?;

        self.with_items(tx, wishlist).await
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut wishlist: WishlistRecord,
    ) -> Result<WishlistRecord, WishlistsServiceError> {
        self.items_repository
            .refresh_item_snapshots(tx, wishlist.uuid)
            .await?;

        wishlist.items = self.items_repository.list_items(tx, wishlist.uuid).await?;

        Ok(wishlist)
    }
}

#[async_trait]
impl WishlistsService for PgWishlistsService {
    async fn get_wishlist(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let wishlist = self
            .wishlists_repository
            .find_or_create_wishlist(&mut tx, user)
            .await?;

        let wishlist = self.with_items(&mut tx, wishlist).await?;

        tx.commit().await?;

        Ok(wishlist)
    }

    async fn add_item(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let product = self
            .products_repository
            .find_product(&mut tx, product)
            .await?
            .ok_or(WishlistsServiceError::ProductNotFound)?;

        let wishlist = self
            .wishlists_repository
            .find_or_create_wishlist(&mut tx, user)
            .await?;

        self.items_repository
            .upsert_item(&mut tx, wishlist.uuid, &product)
            .await?;

        self.wishlists_repository
            .touch_wishlist(&mut tx, wishlist.uuid)
            .await?;

        let wishlist = self.with_items(&mut tx, wishlist).await?;

        tx.commit().await?;

        Ok(wishlist)
    }

    async fn remove_item(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let wishlist = self.existing_wishlist(&mut tx, user).await?;

        let rows_affected = self
            .items_repository
            .remove_item(&mut tx, wishlist.uuid, product)
            .await?;

        if rows_affected == 0 {
            return Err(WishlistsServiceError::ItemNotFound);
        }

        self.wishlists_repository
            .touch_wishlist(&mut tx, wishlist.uuid)
            .await?;

        let wishlist = self.existing_wishlist(&mut tx, user).await?;

        tx.commit().await?;

        Ok(wishlist)
    }

    async fn clear_wishlist(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let mut wishlist = self.existing_wishlist(&mut tx, user).await?;

        self.items_repository
            .clear_items(&mut tx, wishlist.uuid)
            .await?;

        self.wishlists_repository
            .touch_wishlist(&mut tx, wishlist.uuid)
            .await?;

        tx.commit().await?;

        wishlist.items.clear();

        Ok(wishlist)
    }

    async fn is_in_wishlist(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<bool, WishlistsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let exists = self
            .wishlists_repository
            .contains_product(&mut tx, user, product)
            .await?;

        tx.commit().await?;

        Ok(exists)
    }

    async fn count_items(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<u64, WishlistsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let count = self
            .wishlists_repository
            .count_wishlist_items(&mut tx, user)
            .await?;

        tx.commit().await?;

        Ok(count)
    }

    #[tracing::instrument(
        name = "wishlists.service.move_to_cart",
        skip(self),
        fields(tenant_uuid = %tenant, user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn move_to_cart(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<MovedToCart, WishlistsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let wishlist = self.existing_wishlist(&mut tx, user).await?;

        if !wishlist.contains(product) {
            return Err(WishlistsServiceError::ItemNotFound);
        }

        let cart = self
            .carts
            .add_item_in_transaction(&mut tx, user, &NewCartItem::new(product, quantity))
            .await?;

        self.items_repository
            .remove_item(&mut tx, wishlist.uuid, product)
            .await?;

        self.wishlists_repository
            .touch_wishlist(&mut tx, wishlist.uuid)
            .await?;

        let wishlist = self.existing_wishlist(&mut tx, user).await?;

        tx.commit().await?;

        info!(quantity, "moved wishlist item to cart");

        Ok(MovedToCart { wishlist, cart })
    }
}

#[automock]
#[async_trait]
pub trait WishlistsService: Send + Sync {
    /// Returns the user's wishlist, creating an empty one on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the wishlist cannot be loaded or created.
    async fn get_wishlist(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError>;

    /// Adds a product. Adding it again only refreshes the stored product details.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistsServiceError::ProductNotFound`] if there is no such live product.
    async fn add_item(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError>;

    /// Removes a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistsServiceError::ItemNotFound`] if the product is not in the wishlist.
    async fn remove_item(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError>;

    /// Removes every item.
    ///
    /// # Errors
    ///
    /// Returns an error if the wishlist cannot be updated.
    async fn clear_wishlist(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<WishlistRecord, WishlistsServiceError>;

    /// Never creates a wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn is_in_wishlist(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<bool, WishlistsServiceError>;

    /// Never creates a wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn count_items(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<u64, WishlistsServiceError>;

    /// Removes the product from the wishlist and adds `quantity` of it to the cart, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not in the wishlist or cannot be added to the cart.
    async fn move_to_cart(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<MovedToCart, WishlistsServiceError>;
}
