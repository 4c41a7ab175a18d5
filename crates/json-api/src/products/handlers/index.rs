//! Product Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::Envelope, extensions::*, products::errors::into_status_error,
    products::get::ProductResponse, state::State,
};

/// Product Index Handler
///
/// Returns the live catalog.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<Vec<ProductResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.principal_or_401()?.tenant;

    let products = state
        .app
        .products
        .list_products(tenant)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Products retrieved successfully",
        products.into_iter().map(Into::into).collect(),
    ))
}
