//! List Orders Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::{
    domain::orders::{data::OrderFilter, records::OrderRecord},
    pagination::{Page, PageRequest},
};

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{
        errors::into_status_error,
        get::{OrderResponse, Status},
    },
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaginationResponse {
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrdersPageResponse {
    pub orders: Vec<OrderResponse>,
    pub pagination: PaginationResponse,
}

impl From<Page<OrderRecord>> for OrdersPageResponse {
    fn from(page: Page<OrderRecord>) -> Self {
        OrdersPageResponse {
            pagination: PaginationResponse {
                page: page.page,
                limit: page.limit,
                total_items: page.total_items,
                total_pages: page.total_pages,
                has_next_page: page.has_next_page,
                has_prev_page: page.has_prev_page,
            },
            orders: page.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// List Orders Handler
///
/// Newest first. Customers see their own orders; admins see the whole tenant
/// and may narrow to one customer with `user`.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders retrieved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.index", skip_all, err)]
pub(crate) async fn handler(
    page: QueryParam<u64, false>,
    limit: QueryParam<u64, false>,
    status: QueryParam<Status, false>,
    user: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrdersPageResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let filter = OrderFilter {
        user: if principal.is_admin() {
            user.into_inner().map(Into::into)
        } else {
            principal.user
        },
        status: status.into_inner().map(Into::into),
    };

    let page = PageRequest::new(page.into_inner(), limit.into_inner());

    let orders = state
        .app
        .orders
        .list_orders(principal.tenant, filter, page)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Orders retrieved successfully", orders.into()))
}
