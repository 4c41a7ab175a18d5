//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::products::records::ProductRecord;

use crate::{envelope::Envelope, extensions::*, products::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub name: String,

    pub sku: String,

    pub image: Option<String>,

    /// The price of the product in pence/cents
    pub price: u64,

    pub stock: u64,

    /// Whether the product can currently be bought
    pub is_available: bool,

    pub created_at: String,

    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        let is_available = product.is_available();

        ProductResponse {
            uuid: product.uuid.into(),
            name: product.name,
            sku: product.sku,
            image: product.image,
            price: product.price,
            stock: product.stock,
            is_available,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.principal_or_401()?.tenant;

    let product = state
        .app
        .products
        .get_product(tenant, product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Product retrieved successfully", product.into()))
}
