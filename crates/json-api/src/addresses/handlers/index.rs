//! List Addresses Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::addresses::records::{AddressLabel, AddressRecord};

use crate::{
    addresses::errors::into_status_error, envelope::Envelope, extensions::*, state::State,
};

/// Address label as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Label {
    Home,
    Work,
    Other,
}

impl From<Label> for AddressLabel {
    fn from(label: Label) -> Self {
        match label {
            Label::Home => AddressLabel::Home,
            Label::Work => AddressLabel::Work,
            Label::Other => AddressLabel::Other,
        }
    }
}

impl From<AddressLabel> for Label {
    fn from(label: AddressLabel) -> Self {
        match label {
            AddressLabel::Home => Label::Home,
            AddressLabel::Work => Label::Work,
            AddressLabel::Other => Label::Other,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressResponse {
    pub uuid: Uuid,
    pub label: Label,
    pub address: String,
    pub country: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_no: String,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AddressRecord> for AddressResponse {
    fn from(address: AddressRecord) -> Self {
        AddressResponse {
            uuid: address.uuid.into(),
            label: address.label.into(),
            address: address.address,
            country: address.country,
            first_name: address.first_name,
            last_name: address.last_name,
            mobile_no: address.mobile_no,
            is_default: address.is_default,
            created_at: address.created_at.to_string(),
            updated_at: address.updated_at.to_string(),
        }
    }
}

/// List Addresses Handler
///
/// The default address comes first.
#[endpoint(
    tags("addresses"),
    summary = "List Addresses",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Addresses retrieved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "addresses.index", skip_all, err)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<Vec<AddressResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (tenant, user) = depot.customer_or_403()?;

    let addresses = state
        .app
        .addresses
        .list_addresses(tenant, user)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Addresses retrieved successfully",
        addresses.into_iter().map(Into::into).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazaar_app::domain::addresses::{
        AddressesServiceError, MockAddressesService, records::AddressUuid,
    };

    use crate::test_helpers::{
        TEST_TENANT_UUID, TEST_USER_UUID, TestState, customer_service, make_address,
        storage_error,
    };

    use super::*;

    fn make_service(addresses: MockAddressesService) -> Service {
        customer_service(
            TestState::new().with_addresses(addresses),
            Router::with_path("addresses").get(handler),
        )
    }

    #[tokio::test]
    async fn test_list_addresses_scoped_to_caller() -> TestResult {
        let default = AddressUuid::new();
        let other = AddressUuid::new();

        let mut addresses = MockAddressesService::new();

        addresses
            .expect_list_addresses()
            .once()
            .withf(|tenant, user| *tenant == TEST_TENANT_UUID && *user == TEST_USER_UUID)
            .return_once(move |_, _| {
                Ok(vec![make_address(default, true), make_address(other, false)])
            });

        let mut res = TestClient::get("http://example.com/addresses")
            .send(&make_service(addresses))
            .await;

        let body: Envelope<Vec<AddressResponse>> = res.take_json().await?;
        let uuids: Vec<Uuid> = body.data.iter().map(|a| a.uuid).collect();

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success);
        assert_eq!(uuids, vec![default.into_uuid(), other.into_uuid()]);
        assert_eq!(body.data.first().map(|a| a.label), Some(Label::Home));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_addresses_storage_failure_returns_500() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_list_addresses()
            .once()
            .return_once(|_, _| Err(AddressesServiceError::Sql(storage_error())));

        let mut res = TestClient::get("http://example.com/addresses")
            .send(&make_service(addresses))
            .await;

        let body: Envelope<serde_json::Value> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!body.success);

        Ok(())
    }
}
