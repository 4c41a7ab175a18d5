//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
    types::Json,
};
use uuid::Uuid;

use crate::{
    database::{from_bigint, to_bigint},
    domain::{
        orders::{
            data::{NewOrder, OrderFilter, OrderStatusUpdate},
            records::{
                OrderAddress, OrderRecord, OrderStatus, OrderUuid, PaymentMethod, PaymentStatus,
            },
        },
        users::UserUuid,
    },
    pagination::PageRequest,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const GET_ORDER_BY_NUMBER_SQL: &str = include_str!("../sql/get_order_by_number.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");
const CANCEL_ORDER_SQL: &str = include_str!("../sql/cancel_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const BULK_UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/bulk_update_order_status.sql");
const ORDER_STATS_SQL: &str = include_str!("../sql/order_stats.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order_number: Uuid,
        order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order_number)
            .bind(user.into_uuid())
            .bind(Json(&order.shipping_address))
            .bind(Json(&order.billing_address))
            .bind(order.payment_method.as_str())
            .bind(to_bigint(order.subtotal, "subtotal")?)
            .bind(to_bigint(order.tax, "tax")?)
            .bind(to_bigint(order.discount, "discount")?)
            .bind(to_bigint(order.shipping_cost, "shipping_cost")?)
            .bind(to_bigint(order.total, "total")?)
            .bind(order.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetches an order, restricted to `owner` when given.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        owner: Option<UserUuid>,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(owner.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    /// Like [`Self::get_order`], holding a row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        owner: Option<UserUuid>,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(owner.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_by_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order_number: Uuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_BY_NUMBER_SQL)
            .bind(order_number)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Newest first.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.user.map(UserUuid::into_uuid))
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(to_bigint(page.limit(), "limit")?)
            .bind(to_bigint(page.offset(), "offset")?)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrderFilter,
    ) -> Result<u64, sqlx::Error> {
        let count = query_scalar::<Postgres, i64>(COUNT_ORDERS_SQL)
            .bind(filter.user.map(UserUuid::into_uuid))
            .bind(filter.status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        from_bigint(count, "count")
    }

    /// Cancels the order if it is still cancellable; `None` leaves it unchanged.
    pub(crate) async fn cancel_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        reason: Option<&str>,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CANCEL_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(reason)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &OrderStatusUpdate,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(update.order_status.as_str())
            .bind(update.payment_status.map(PaymentStatus::as_str))
            .bind(update.tracking_number.as_deref())
            .bind(update.estimated_delivery.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn bulk_update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().copied().map(OrderUuid::into_uuid).collect();

        let rows_affected = query(BULK_UPDATE_ORDER_STATUS_SQL)
            .bind(uuids)
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// `(status, order count, sum of totals)` per status present.
    pub(crate) async fn order_stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: Option<UserUuid>,
    ) -> Result<Vec<(OrderStatus, u64, u64)>, sqlx::Error> {
        let rows = query(ORDER_STATS_SQL)
            .bind(owner.map(UserUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| -> Result<(OrderStatus, u64, u64), sqlx::Error> {
                Ok((
                    try_get_enum::<OrderStatus>(row, "order_status")?,
                    from_bigint(row.try_get("order_count")?, "order_count")?,
                    from_bigint(row.try_get("total_amount")?, "total_amount")?,
                ))
            })
            .collect()
    }
}

fn try_get_enum<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse::<T>().map_err(|error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    })
}

fn try_get_amount(row: &PgRow, column: &str) -> Result<u64, sqlx::Error> {
    from_bigint(row.try_get(column)?, column)
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(shipping_address) = row.try_get::<Json<OrderAddress>, _>("shipping_address")?;
        let Json(billing_address) = row.try_get::<Json<OrderAddress>, _>("billing_address")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            shipping_address,
            billing_address,
            payment_method: try_get_enum::<PaymentMethod>(row, "payment_method")?,
            payment_status: try_get_enum::<PaymentStatus>(row, "payment_status")?,
            order_status: try_get_enum::<OrderStatus>(row, "order_status")?,
            subtotal: try_get_amount(row, "subtotal")?,
            tax: try_get_amount(row, "tax")?,
            discount: try_get_amount(row, "discount")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            total: try_get_amount(row, "total")?,
            notes: row.try_get("notes")?,
            tracking_number: row.try_get("tracking_number")?,
            estimated_delivery: row
                .try_get::<Option<SqlxTimestamp>, _>("estimated_delivery")?
                .map(SqlxTimestamp::to_jiff),
            cancellation_reason: row.try_get("cancellation_reason")?,
            cancelled_at: row
                .try_get::<Option<SqlxTimestamp>, _>("cancelled_at")?
                .map(SqlxTimestamp::to_jiff),
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
