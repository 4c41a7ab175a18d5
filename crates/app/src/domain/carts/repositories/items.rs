//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::{from_bigint, to_bigint},
    domain::{
        carts::{
            data::NewCartItem,
            records::{CartItemRecord, CartItemUuid, CartUuid, SelectedOptions},
        },
        products::records::{ProductRecord, ProductUuid},
    },
};

const LIST_CART_ITEMS_SQL: &str = include_str!("../sql/list_cart_items.sql");
const REFRESH_CART_ITEMS_SQL: &str = include_str!("../sql/refresh_cart_items.sql");
const ADD_CART_ITEM_SQL: &str = include_str!("../sql/add_cart_item.sql");
const PUT_CART_ITEM_SQL: &str = include_str!("../sql/put_cart_item.sql");
const REMOVE_CART_ITEM_SQL: &str = include_str!("../sql/remove_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(LIST_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Re-reads price and stock for every line from the product catalogue.
    pub(crate) async fn refresh_item_snapshots(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REFRESH_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Inserts a line or adds `item.quantity` to the existing line for the product.
    pub(crate) async fn add_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: &ProductRecord,
        item: &NewCartItem,
    ) -> Result<CartItemRecord, sqlx::Error> {
        self.upsert(ADD_CART_ITEM_SQL, tx, cart, product, item).await
    }

    /// Inserts a line or overwrites the quantity of the existing line.
    pub(crate) async fn put_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: &ProductRecord,
        item: &NewCartItem,
    ) -> Result<CartItemRecord, sqlx::Error> {
        self.upsert(PUT_CART_ITEM_SQL, tx, cart, product, item).await
    }

    async fn upsert(
        &self,
        sql: &'static str,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: &ProductRecord,
        item: &NewCartItem,
    ) -> Result<CartItemRecord, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(sql)
            .bind(CartItemUuid::new().into_uuid())
            .bind(cart.into_uuid())
            .bind(product.uuid.into_uuid())
            .bind(to_bigint(item.quantity, "quantity")?)
            .bind(to_bigint(product.price, "unit_price")?)
            .bind(product.is_available())
            .bind(to_bigint(product.stock, "stock_available")?)
            .bind(Json(&item.selected_options))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn remove_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REMOVE_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(selected_options) = row.try_get::<Json<SelectedOptions>, _>("selected_options")?;

        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: from_bigint(row.try_get("quantity")?, "quantity")?,
            unit_price: from_bigint(row.try_get("unit_price")?, "unit_price")?,
            is_available: row.try_get("is_available")?,
            stock_available: from_bigint(row.try_get("stock_available")?, "stock_available")?,
            selected_options,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
