mod common;

use cafe_pos::{
    app_error::AppError,
    models::NewOrderLine,
    money::Money,
    store::{
        orders::create_order,
        products::{create_product, delete_product, get_product, list_products, update_product},
    },
    validation::ProductForm,
};
use common::*;

#[test]
fn create_and_list_products() {
    let conn = &mut setup();
    let form = ProductForm::new("Latte", "Espresso with milk", "120", Some("images/latte.png"))
        .unwrap();
    let latte = create_product(conn, &form).unwrap();
    seed_product(conn, "Mocha", "95.50");

    assert_eq!(latte.price, Money::from_cents(12_000));
    assert_eq!(latte.image_path.as_deref(), Some("images/latte.png"));

    let products = list_products(conn).unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0], latte);
    assert_eq!(products[1].price, Money::from_cents(9_550));
}

#[test]
fn update_replaces_every_field() {
    let conn = &mut setup();
    let form = ProductForm::new("Latte", "hot", "120", Some("latte.png")).unwrap();
    let latte = create_product(conn, &form).unwrap();

    let form = ProductForm::new("Iced Latte", "cold", "135", None).unwrap();
    let updated = update_product(conn, latte.id, &form).unwrap();

    assert_eq!(updated.name, "Iced Latte");
    assert_eq!(updated.description, "cold");
    assert_eq!(updated.price, Money::from_cents(13_500));
    assert_eq!(updated.image_path, None);
    assert_eq!(get_product(conn, latte.id).unwrap(), updated);
}

#[test]
fn missing_products_are_not_found() {
    let conn = &mut setup();
    let form = ProductForm::new("Latte", "", "120", None).unwrap();

    assert!(matches!(get_product(conn, 99), Err(AppError::NotFound)));
    assert!(matches!(update_product(conn, 99, &form), Err(AppError::NotFound)));
    assert!(matches!(delete_product(conn, 99), Err(AppError::NotFound)));
}

#[test]
fn delete_unreferenced_product() {
    let conn = &mut setup();
    let latte = seed_product(conn, "Latte", "120");

    let deleted = delete_product(conn, latte.id).unwrap();
    assert_eq!(deleted.id, latte.id);
    assert!(list_products(conn).unwrap().is_empty());
}

#[test]
fn product_on_an_order_cannot_be_deleted() {
    let conn = &mut setup();
    let cashier = seed_account(conn, "barista");
    let latte = seed_product(conn, "Latte", "120");
    create_order(
        conn,
        cashier.id,
        &[NewOrderLine {
            product_id: latte.id,
            quantity: 2,
            unit_price: latte.price,
        }],
    )
    .unwrap();

    let err = delete_product(conn, latte.id).unwrap_err();
    assert!(matches!(
        err,
        AppError::ProductInUse {
            product_id,
            line_items: 1
        } if product_id == latte.id
    ));
    assert_eq!(list_products(conn).unwrap().len(), 1);
}
