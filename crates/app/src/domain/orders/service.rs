//! Orders service.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::PgCartsService,
        orders::{
            data::{NewOrder, OrderFilter, OrderStatusUpdate},
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderRecord, OrderStats, OrderStatus, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        tenants::records::TenantUuid,
        users::UserUuid,
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    carts: PgCartsService,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            carts: PgCartsService::new(db.clone()),
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
        }
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut order: OrderRecord,
    ) -> Result<OrderRecord, OrdersServiceError> {
        order.items = self.items_repository.list_items(tx, &[order.uuid]).await?;

        Ok(order)
    }
}

/// Distributes lines onto their orders, keeping each order's line order.
fn attach_items(orders: &mut [OrderRecord], items: Vec<OrderItemRecord>) {
    let mut by_order: HashMap<OrderUuid, Vec<OrderItemRecord>> = HashMap::new();

    for item in items {
        by_order.entry(item.order_uuid).or_default().push(item);
    }

    for order in orders {
        order.items = by_order.remove(&order.uuid).unwrap_or_default();
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            tenant_uuid = %tenant,
            user_uuid = %user,
            order_uuid = %order.uuid,
            order_number = tracing::field::Empty,
            item_count = order.items.len()
        ),
        err
    )]
    async fn create_order(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        order.check_totals()?;

        let order_number = Uuid::new_v4();

        Span::current().record("order_number", tracing::field::display(order_number));

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let mut record = self
            .orders_repository
            .create_order(&mut tx, user, order_number, &order)
            .await?;

        record.items = self
            .items_repository
            .create_items(&mut tx, record.uuid, &order.items)
            .await?;

        if order.clear_cart {
            self.carts.clear_cart_in_transaction(&mut tx, user).await?;
        }

        tx.commit().await?;

        info!(total = record.total, "created order");

        Ok(record)
    }

    async fn list_orders(
        &self,
        tenant: TenantUuid,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let total = self.orders_repository.count_orders(&mut tx, filter).await?;

        let mut orders = self
            .orders_repository
            .list_orders(&mut tx, filter, page)
            .await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let items = self.items_repository.list_items(&mut tx, &uuids).await?;

        tx.commit().await?;

        attach_items(&mut orders, items);

        Ok(Page::new(orders, page, total))
    }

    async fn get_order(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
        owner: Option<UserUuid>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let order = self.orders_repository.get_order(&mut tx, order, owner).await?;
        let order = self.with_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn get_order_by_number(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order_number: Uuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let order = self
            .orders_repository
            .get_order_by_number(&mut tx, user, order_number)
            .await?;

        let order = self.with_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self, reason),
        fields(tenant_uuid = %tenant, user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn cancel_order(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order: OrderUuid,
        reason: Option<String>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let current = self
            .orders_repository
            .lock_order(&mut tx, order, Some(user))
            .await?;

        if !current.order_status.is_cancellable() {
            return Err(OrdersServiceError::NotCancellable {
                status: current.order_status,
            });
        }

        let cancelled = self
            .orders_repository
            .cancel_order(&mut tx, order, reason.as_deref())
            .await?
            .ok_or(OrdersServiceError::NotCancellable {
                status: current.order_status,
            })?;

        let cancelled = self.with_items(&mut tx, cancelled).await?;

        tx.commit().await?;

        info!("cancelled order");

        Ok(cancelled)
    }

    #[tracing::instrument(
        name = "orders.service.update_order_status",
        skip(self, update),
        fields(
            tenant_uuid = %tenant,
            order_uuid = %order,
            order_status = %update.order_status
        ),
        err
    )]
    async fn update_order_status(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let current = self.orders_repository.lock_order(&mut tx, order, None).await?;

        if current.order_status != update.order_status
            && !current.order_status.is_forward_to(update.order_status)
        {
            warn!(
                from = %current.order_status,
                to = %update.order_status,
                "order status moved against the fulfilment flow"
            );
        }

        let updated = self
            .orders_repository
            .update_order_status(&mut tx, order, &update)
            .await?;

        let updated = self.with_items(&mut tx, updated).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn bulk_update_order_status(
        &self,
        tenant: TenantUuid,
        orders: Vec<OrderUuid>,
        status: OrderStatus,
    ) -> Result<u64, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .orders_repository
            .bulk_update_order_status(&mut tx, &orders, status)
            .await?;

        tx.commit().await?;

        info!(
            tenant_uuid = %tenant,
            requested = orders.len(),
            updated,
            order_status = %status,
            "bulk updated order status"
        );

        Ok(updated)
    }

    async fn order_stats(
        &self,
        tenant: TenantUuid,
        owner: Option<UserUuid>,
    ) -> Result<OrderStats, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let groups = self.orders_repository.order_stats(&mut tx, owner).await?;

        tx.commit().await?;

        Ok(OrderStats::from_groups(&groups))
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Places an order with `pending` order and payment status.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is invalid or cannot be stored.
    async fn create_order(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Lists orders newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn list_orders(
        &self,
        tenant: TenantUuid,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// Retrieve an order; with `owner` set, orders of other users are not found.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] if the order is not visible.
    async fn get_order(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
        owner: Option<UserUuid>,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve one of the user's orders by its public number.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] if the user has no such order.
    async fn get_order_by_number(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order_number: Uuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancels a pending or confirmed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is missing or can no longer be cancelled.
    async fn cancel_order(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order: OrderUuid,
        reason: Option<String>,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Sets any status, stamping `delivered_at` / `cancelled_at` as it goes.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] if the order does not exist.
    async fn update_order_status(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Returns the number of orders updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails; nothing is changed then.
    async fn bulk_update_order_status(
        &self,
        tenant: TenantUuid,
        orders: Vec<OrderUuid>,
        status: OrderStatus,
    ) -> Result<u64, OrdersServiceError>;

    /// Stats for one customer, or the whole tenant when `owner` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn order_stats(
        &self,
        tenant: TenantUuid,
        owner: Option<UserUuid>,
    ) -> Result<OrderStats, OrdersServiceError>;
}
