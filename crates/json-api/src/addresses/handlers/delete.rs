//! Delete Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    addresses::errors::into_status_error, envelope::Envelope, extensions::*, state::State,
};

/// Delete Address Handler
///
/// Deleting the default promotes the oldest remaining address.
#[endpoint(
    tags("addresses"),
    summary = "Delete Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "addresses.delete", skip_all, err)]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<Uuid>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let uuid = address.into_inner();

    state
        .app
        .addresses
        .delete_address(tenant, user, uuid.into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Address deleted successfully", uuid))
}
