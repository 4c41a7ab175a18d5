//! Set Default Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    addresses::{errors::into_status_error, index::AddressResponse},
    envelope::Envelope,
    extensions::*,
    state::State,
};

/// Set Default Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Set Default Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Default address updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "addresses.set_default", skip_all, err)]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<AddressResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let address = state
        .app
        .addresses
        .set_default_address(tenant, user, address.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Default address set successfully", address.into()))
}
