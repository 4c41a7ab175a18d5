//! Wishlist Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{from_bigint, to_bigint},
    domain::{
        products::records::{ProductRecord, ProductUuid},
        wishlists::records::{WishlistItemRecord, WishlistItemUuid, WishlistUuid},
    },
};

const LIST_WISHLIST_ITEMS_SQL: &str = include_str!("../sql/list_wishlist_items.sql");
const REFRESH_WISHLIST_ITEMS_SQL: &str = include_str!("../sql/refresh_wishlist_items.sql");
const UPSERT_WISHLIST_ITEM_SQL: &str = include_str!("../sql/upsert_wishlist_item.sql");
const REMOVE_WISHLIST_ITEM_SQL: &str = include_str!("../sql/remove_wishlist_item.sql");
const CLEAR_WISHLIST_ITEMS_SQL: &str = include_str!("../sql/clear_wishlist_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWishlistItemsRepository;

impl PgWishlistItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Newest first.
    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
    ) -> Result<Vec<WishlistItemRecord>, sqlx::Error> {
        query_as::<Postgres, WishlistItemRecord>(LIST_WISHLIST_ITEMS_SQL)
            .bind(wishlist.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn refresh_item_snapshots(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REFRESH_WISHLIST_ITEMS_SQL)
            .bind(wishlist.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Inserts the product, or refreshes its snapshot when already present.
    ///
    /// `added_at` of an existing item is left untouched.
    pub(crate) async fn upsert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
        product: &ProductRecord,
    ) -> Result<WishlistItemRecord, sqlx::Error> {
        query_as::<Postgres, WishlistItemRecord>(UPSERT_WISHLIST_ITEM_SQL)
            .bind(WishlistItemUuid::new().into_uuid())
            .bind(wishlist.into_uuid())
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(to_bigint(product.price, "product_price")?)
            .bind(product.image.as_deref())
            .bind(&product.sku)
            .bind(product.is_available())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn remove_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REMOVE_WISHLIST_ITEM_SQL)
            .bind(wishlist.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_WISHLIST_ITEMS_SQL)
            .bind(wishlist.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for WishlistItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WishlistItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            product_price: from_bigint(row.try_get("product_price")?, "product_price")?,
            product_image: row.try_get("product_image")?,
            product_sku: row.try_get("product_sku")?,
            is_available: row.try_get("is_available")?,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
        })
    }
}
