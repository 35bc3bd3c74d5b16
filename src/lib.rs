//! Point-of-sale core for a single shop: staff accounts, a product catalog,
//! cart checkout into orders, a kitchen queue and sales history, all backed by
//! SQLite through Diesel.

pub mod app_error;
pub mod app_state;
pub mod auth;
pub mod bootstrap;
pub mod cart;
pub mod config;
pub mod db;
pub mod models;
pub mod money;
pub mod schema;
pub mod session;
pub mod store;
pub mod validation;
