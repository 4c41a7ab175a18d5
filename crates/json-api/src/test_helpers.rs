//! Test helpers.

use std::sync::Arc;

use bazaar_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        addresses::{
            MockAddressesService,
            records::{AddressLabel, AddressRecord, AddressUuid},
        },
        carts::{
            MockCartsService,
            records::{CartRecord, CartUuid},
        },
        orders::{
            MockOrdersService,
            records::{
                OrderAddress, OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid,
                PaymentMethod, PaymentStatus,
            },
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        tenants::records::TenantUuid,
        users::UserUuid,
        wishlists::{
            MockWishlistsService,
            records::{WishlistRecord, WishlistUuid},
        },
    },
};
use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, router::service, state::State};

pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(1));

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal::customer(TEST_TENANT_UUID, TEST_USER_UUID));
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal::admin(TEST_TENANT_UUID));
    ctrl.call_next(req, depot, res).await;
}

/// Mocks without expectations fail any call, so untouched services stay strict.
#[derive(Default)]
pub(crate) struct TestState {
    products: MockProductsService,
    addresses: MockAddressesService,
    carts: MockCartsService,
    wishlists: MockWishlistsService,
    orders: MockOrdersService,
    auth: MockAuthService,
}

impl TestState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_products(mut self, products: MockProductsService) -> Self {
        self.products = products;
        self
    }

    pub(crate) fn with_addresses(mut self, addresses: MockAddressesService) -> Self {
        self.addresses = addresses;
        self
    }

    pub(crate) fn with_carts(mut self, carts: MockCartsService) -> Self {
        self.carts = carts;
        self
    }

    pub(crate) fn with_wishlists(mut self, wishlists: MockWishlistsService) -> Self {
        self.wishlists = wishlists;
        self
    }

    pub(crate) fn with_orders(mut self, orders: MockOrdersService) -> Self {
        self.orders = orders;
        self
    }

    pub(crate) fn with_auth(mut self, auth: MockAuthService) -> Self {
        self.auth = auth;
        self
    }

    pub(crate) fn build(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            addresses: Arc::new(self.addresses),
            carts: Arc::new(self.carts),
            wishlists: Arc::new(self.wishlists),
            orders: Arc::new(self.orders),
            auth: Arc::new(self.auth),
        })
    }
}

/// Serves `route` as the test customer.
pub(crate) fn customer_service(state: TestState, route: Router) -> Service {
    service(
        Router::new()
            .hoop(inject(state.build()))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Serves `route` as the test tenant's admin.
pub(crate) fn admin_service(state: TestState, route: Router) -> Service {
    service(
        Router::new()
            .hoop(inject(state.build()))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Widget".to_string(),
        sku: "WID-1".to_string(),
        image: None,
        price: 100,
        stock: 10,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_address(uuid: AddressUuid, is_default: bool) -> AddressRecord {
    AddressRecord {
        uuid,
        user_uuid: TEST_USER_UUID,
        label: AddressLabel::Home,
        address: "1 High Street".to_string(),
        country: "GB".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        mobile_no: "07700900000".to_string(),
        is_default,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart() -> CartRecord {
    CartRecord {
        uuid: CartUuid::new(),
        user_uuid: TEST_USER_UUID,
        coupon: None,
        items: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_wishlist() -> WishlistRecord {
    WishlistRecord {
        uuid: WishlistUuid::new(),
        user_uuid: TEST_USER_UUID,
        items: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order_address() -> OrderAddress {
    OrderAddress {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "1 High Street".to_string(),
        country: "GB".to_string(),
        mobile_no: "07700900000".to_string(),
    }
}

pub(crate) fn make_order(uuid: OrderUuid, order_status: OrderStatus) -> OrderRecord {
    OrderRecord {
        uuid,
        order_number: Uuid::new_v4(),
        user_uuid: TEST_USER_UUID,
        items: vec![OrderItemRecord {
            uuid: OrderItemUuid::new(),
            order_uuid: uuid,
            product_uuid: ProductUuid::new(),
            title: "Widget".to_string(),
            image: Some("/i.jpg".to_string()),
            price: 10,
            quantity: 2,
            total_price: 20,
        }],
        shipping_address: make_order_address(),
        billing_address: make_order_address(),
        payment_method: PaymentMethod::CashOnDelivery,
        payment_status: PaymentStatus::Pending,
        order_status,
        subtotal: 20,
        tax: 0,
        discount: 0,
        shipping_cost: 0,
        total: 20,
        notes: None,
        tracking_number: None,
        estimated_delivery: None,
        cancellation_reason: None,
        cancelled_at: None,
        delivered_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// Stand-in for any storage failure a service can surface.
pub(crate) fn storage_error() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}
