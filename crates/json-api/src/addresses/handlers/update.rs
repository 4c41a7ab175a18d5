//! Update Address Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bazaar_app::domain::addresses::data::AddressUpdate;

use crate::{
    addresses::{
        errors::into_status_error,
        index::{AddressResponse, Label},
    },
    envelope::Envelope,
    extensions::*,
    state::State,
};

/// Update Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateAddressRequest {
    pub label: Label,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,

    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 20, message = "Mobile number is invalid"))]
    pub mobile_no: String,

    /// `false` never demotes the current default
    pub is_default: Option<bool>,
}

impl From<UpdateAddressRequest> for AddressUpdate {
    fn from(request: UpdateAddressRequest) -> Self {
        AddressUpdate {
            label: request.label.into(),
            address: request.address,
            country: request.country,
            first_name: request.first_name,
            last_name: request.last_name,
            mobile_no: request.mobile_no,
            is_default: request.is_default,
        }
    }
}

/// Update Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Update Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "addresses.update",
    skip(address, json, depot),
    fields(address_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    json: JsonBody<UpdateAddressRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<AddressResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;
    let request = json.into_inner().validated()?;
    let address = address.into_inner();

    tracing::Span::current().record("address_uuid", tracing::field::display(address));

    let updated = state
        .app
        .addresses
        .update_address(tenant, user, address.into(), request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Address updated successfully", updated.into()))
}
