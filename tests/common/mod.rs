#![allow(dead_code)]

use cafe_pos::{
    db,
    models::{AccountEntity, ProductEntity, Role},
    store::{accounts, products},
    validation::ProductForm,
};
use diesel::SqliteConnection;

pub const PASSWORD: &str = "secret";

/// A fresh in-memory database with the schema applied.
pub fn setup() -> SqliteConnection {
    let mut conn = db::establish(":memory:").expect("open in-memory database");
    db::run_migrations(&mut conn).expect("apply migrations");
    conn
}

pub fn seed_account(conn: &mut SqliteConnection, username: &str) -> AccountEntity {
    accounts::register(conn, username, PASSWORD, Role::Staff).expect("register account")
}

pub fn seed_product(conn: &mut SqliteConnection, name: &str, price: &str) -> ProductEntity {
    let form = ProductForm::new(name, "", price, None).expect("valid product form");
    products::create_product(conn, &form).expect("create product")
}
