//! Create Address Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use bazaar_app::domain::addresses::{data::NewAddress, records::AddressUuid};

use crate::{
    addresses::{
        errors::into_status_error,
        index::{AddressResponse, Label},
    },
    envelope::Envelope,
    extensions::*,
    state::State,
};

/// Create Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateAddressRequest {
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

    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateAddressRequest> for NewAddress {
    fn from(request: CreateAddressRequest) -> Self {
        NewAddress {
            uuid: AddressUuid::new(),
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

/// Create Address Handler
///
/// A user's first address always becomes their default.
#[endpoint(
    tags("addresses"),
    summary = "Create Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "addresses.create", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<CreateAddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<AddressResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;
    let request = json.into_inner().validated()?;

    let address = state
        .app
        .addresses
        .create_address(tenant, user, request.into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Envelope::ok("Address created successfully", address.into()))
}
