//! Wishlists Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::from_bigint,
    domain::{
        products::records::ProductUuid,
        users::UserUuid,
        wishlists::records::{WishlistRecord, WishlistUuid},
    },
};

const FIND_OR_CREATE_WISHLIST_SQL: &str = include_str!("../sql/find_or_create_wishlist.sql");
const FIND_WISHLIST_SQL: &str = include_str!("../sql/find_wishlist.sql");
const TOUCH_WISHLIST_SQL: &str = include_str!("../sql/touch_wishlist.sql");
const WISHLIST_ITEM_EXISTS_SQL: &str = include_str!("../sql/wishlist_item_exists.sql");
const COUNT_WISHLIST_ITEMS_SQL: &str = include_str!("../sql/count_wishlist_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWishlistsRepository;

impl PgWishlistsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_or_create_wishlist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<WishlistRecord, sqlx::Error> {
        query_as::<Postgres, WishlistRecord>(FIND_OR_CREATE_WISHLIST_SQL)
            .bind(WishlistUuid::new().into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_wishlist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<WishlistRecord>, sqlx::Error> {
        query_as::<Postgres, WishlistRecord>(FIND_WISHLIST_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn touch_wishlist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_WISHLIST_SQL)
            .bind(wishlist.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn contains_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(WISHLIST_ITEM_EXISTS_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_wishlist_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count = query_scalar::<Postgres, i64>(COUNT_WISHLIST_ITEMS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        from_bigint(count, "count")
    }
}

impl<'r> FromRow<'r, PgRow> for WishlistRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WishlistUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
