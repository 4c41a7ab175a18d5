//! App Router

use std::sync::Arc;

use salvo::{affix_state::inject, catcher::Catcher, prelude::*, trailing_slash::remove_slash};

use crate::{
    addresses, auth, carts, envelope, healthcheck, observability, orders, products,
    state::State, wishlists,
};

/// Full route tree: open endpoints, the customer surface under `/v1` and the
/// tenant admin surface under `/admin`.
pub(crate) fn app_router(state: Arc<State>) -> Router {
    Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("v1")
                .hoop(auth::middleware::handler)
                .hoop(auth::require_customer)
                .push(customer_routes()),
        )
        .push(
            Router::with_path("admin")
                .hoop(auth::middleware::handler)
                .hoop(auth::require_admin)
                .push(admin_routes()),
        )
}

pub(crate) fn customer_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("addresses")
                .get(addresses::index::handler)
                .post(addresses::create::handler)
                .push(
                    Router::with_path("{address}")
                        .put(addresses::update::handler)
                        .delete(addresses::delete::handler)
                        .push(Router::with_path("default").patch(addresses::set_default::handler)),
                ),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .push(Router::with_path("add").post(carts::add::handler))
                .push(Router::with_path("update/{product}").put(carts::update::handler))
                .push(Router::with_path("remove/{product}").delete(carts::remove::handler))
                .push(Router::with_path("clear").delete(carts::clear::handler))
                .push(Router::with_path("apply-coupon").post(carts::apply_coupon::handler))
                .push(Router::with_path("remove-coupon").delete(carts::remove_coupon::handler))
                .push(Router::with_path("count").get(carts::count::handler))
                .push(Router::with_path("merge-guest").post(carts::merge_guest::handler)),
        )
        .push(
            Router::with_path("wishlist")
                .get(wishlists::get::handler)
                .push(Router::with_path("add").post(wishlists::add::handler))
                .push(Router::with_path("remove/{product}").delete(wishlists::remove::handler))
                .push(Router::with_path("clear").delete(wishlists::clear::handler))
                .push(Router::with_path("check/{product}").get(wishlists::check::handler))
                .push(Router::with_path("count").get(wishlists::count::handler))
                .push(Router::with_path("move-to-cart").post(wishlists::move_to_cart::handler)),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("stats").get(orders::stats::handler))
                .push(Router::with_path("number/{number}").get(orders::get_by_number::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").patch(orders::cancel::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
}

pub(crate) fn admin_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(Router::with_path("stats").get(orders::stats::handler))
                .push(Router::with_path("bulk-status").patch(orders::bulk_status::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("status").patch(orders::update_status::handler)),
                ),
        )
}

/// Wraps a router in a service whose error responses use the envelope.
pub(crate) fn service(router: Router) -> Service {
    Service::new(router).catcher(Catcher::default().hoop(envelope::catcher))
}
