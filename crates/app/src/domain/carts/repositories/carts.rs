//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{from_bigint, to_bigint},
    domain::{
        carts::records::{CartRecord, CartUuid, Coupon, DiscountType},
        users::UserUuid,
    },
};

const FIND_OR_CREATE_CART_SQL: &str = include_str!("../sql/find_or_create_cart.sql");
const FIND_CART_SQL: &str = include_str!("../sql/find_cart.sql");
const GET_CART_BY_UUID_SQL: &str = include_str!("../sql/get_cart_by_uuid.sql");
const SET_CART_COUPON_SQL: &str = include_str!("../sql/set_cart_coupon.sql");
const TOUCH_CART_SQL: &str = include_str!("../sql/touch_cart.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");
const COUNT_CART_ITEMS_SQL: &str = include_str!("../sql/count_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Returns the user's live cart, creating it on first use.
    ///
    /// Concurrent callers converge on the same row through the partial unique index.
    pub(crate) async fn find_or_create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(FIND_OR_CREATE_CART_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(FIND_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Locks a live cart by its own id.
    pub(crate) async fn find_cart_by_uuid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_CART_BY_UUID_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn set_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        coupon: Option<&Coupon>,
    ) -> Result<u64, sqlx::Error> {
        let discount_amount = coupon
            .map(|coupon| to_bigint(coupon.discount_amount, "coupon_discount_amount"))
            .transpose()?;

        let rows_affected = query(SET_CART_COUPON_SQL)
            .bind(cart.into_uuid())
            .bind(coupon.map(|coupon| coupon.code.as_str()))
            .bind(discount_amount)
            .bind(coupon.map(|coupon| coupon.discount_type.as_str()))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn touch_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Sum of line quantities in the user's live cart, zero when there is none.
    pub(crate) async fn count_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count = query_scalar::<Postgres, i64>(COUNT_CART_ITEMS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        from_bigint(count, "count")
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let code: Option<String> = row.try_get("coupon_code")?;
        let amount: Option<i64> = row.try_get("coupon_discount_amount")?;
        let discount_type: Option<String> = row.try_get("coupon_discount_type")?;

        let coupon = match (code, amount, discount_type) {
            (Some(code), Some(amount), Some(discount_type)) => Some(Coupon {
                code,
                discount_amount: from_bigint(amount, "coupon_discount_amount")?,
                discount_type: discount_type.parse::<DiscountType>().map_err(|error| {
                    sqlx::Error::ColumnDecode {
                        index: "coupon_discount_type".to_string(),
                        source: Box::new(error),
                    }
                })?,
            }),
            _ => None,
        };

        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            coupon,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
