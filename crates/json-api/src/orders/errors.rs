//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use bazaar_app::domain::orders::OrdersServiceError;

use crate::carts;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::NotCancellable { status } => StatusError::bad_request()
            .brief("Order cannot be cancelled at this stage")
            .detail(format!("order is {status}")),
        OrdersServiceError::InconsistentTotals(mismatch) => StatusError::bad_request()
            .brief("Order totals are inconsistent")
            .detail(mismatch.to_string()),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Cart(source) => carts::errors::into_status_error(source),
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
