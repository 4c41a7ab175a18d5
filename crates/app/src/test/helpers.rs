//! Test Helpers

use crate::{
    domain::{
        addresses::{
            data::NewAddress,
            records::{AddressLabel, AddressUuid},
        },
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderAddress, OrderUuid, PaymentMethod},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
    },
    test::TestContext,
};

pub(crate) fn new_product(uuid: ProductUuid, price: u64, stock: u64) -> NewProduct {
    NewProduct {
        uuid,
        name: "Widget".to_string(),
        sku: format!("SKU-{uuid}"),
        image: Some("/i.jpg".to_string()),
        price,
        stock,
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    price: u64,
    stock: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(ctx.tenant_uuid, new_product(ProductUuid::new(), price, stock))
        .await
}

pub(crate) fn new_address(is_default: bool) -> NewAddress {
    NewAddress {
        uuid: AddressUuid::new(),
        label: AddressLabel::Home,
        address: "12 St James's Square".to_string(),
        country: "GB".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        mobile_no: "+447700900000".to_string(),
        is_default,
    }
}

/// A single-line order whose totals add up, with no tax, shipping or discount.
pub(crate) fn new_order(price: u64, quantity: u64) -> NewOrder {
    let total = price * quantity;

    let address = OrderAddress {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "12 St James's Square".to_string(),
        country: "GB".to_string(),
        mobile_no: "+447700900000".to_string(),
    };

    NewOrder {
        uuid: OrderUuid::new(),
        items: vec![NewOrderItem {
            product_uuid: ProductUuid::new(),
            title: "Widget".to_string(),
            image: Some("/i.jpg".to_string()),
            price,
            quantity,
            total_price: total,
        }],
        shipping_address: address.clone(),
        billing_address: address,
        payment_method: PaymentMethod::CashOnDelivery,
        subtotal: total,
        tax: 0,
        discount: 0,
        shipping_cost: 0,
        total,
        notes: None,
        clear_cart: true,
    }
}
