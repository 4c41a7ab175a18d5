//! Order Stats Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::orders::records::OrderStats;

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{errors::into_status_error, get::Status},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusCountResponse {
    pub status: Status,
    pub count: u64,
}

/// Order Stats Response
///
/// Spend excludes cancelled and returned orders.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderStatsResponse {
    pub total_orders: u64,
    pub by_status: Vec<StatusCountResponse>,
    pub total_spent: u64,
    pub average_order_value: u64,
}

impl From<OrderStats> for OrderStatsResponse {
    fn from(stats: OrderStats) -> Self {
        OrderStatsResponse {
            total_orders: stats.total_orders,
            by_status: stats
                .by_status
                .into_iter()
                .map(|count| StatusCountResponse {
                    status: count.status.into(),
                    count: count.count,
                })
                .collect(),
            total_spent: stats.total_spent,
            average_order_value: stats.average_order_value,
        }
    }
}

/// Order Stats Handler
///
/// Customer tokens get their own figures; admin tokens get the tenant's.
#[endpoint(
    tags("orders"),
    summary = "Order Stats",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order stats retrieved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.stats", skip_all, err)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderStatsResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let stats = state
        .app
        .orders
        .order_stats(principal.tenant, principal.user)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Order stats retrieved successfully", stats.into()))
}
