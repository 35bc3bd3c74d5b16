use cafe_pos::{
    app_error::AppError,
    models::{OrderStatus, OrderSummary, ReceiptLine},
    session::Session,
    store::{orders, reports},
    validation::{parse_quantity, require},
};
use diesel::SqliteConnection;
use serde::Serialize;

use super::output::Output;

/// Splits a `PRODUCT_ID:QTY` argument.
fn parse_item(raw: &str) -> Result<(i32, i32), AppError> {
    let (product, quantity) = raw
        .split_once(':')
        .ok_or_else(|| AppError::validation(format!("'{raw}' is not PRODUCT_ID:QTY")))?;
    let product = require("product id", product)?;
    let product_id = product
        .parse()
        .map_err(|_| AppError::validation(format!("'{product}' is not a product id")))?;
    Ok((product_id, parse_quantity(quantity)?))
}

fn summary_rows(out: &Output, orders: &[OrderSummary]) -> Vec<Vec<String>> {
    orders
        .iter()
        .map(|o| {
            vec![
                o.id.to_string(),
                o.cashier.clone(),
                out.money(o.total),
                o.status.to_string(),
                o.created_at.to_string(),
            ]
        })
        .collect()
}

const SUMMARY_HEADERS: [&str; 5] = ["Order", "Cashier", "Total", "Status", "Date"];

pub fn place(
    conn: &mut SqliteConnection,
    out: &Output,
    username: &str,
    password: &str,
    items: &[String],
) -> Result<(), AppError> {
    let parsed = items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(mut session) = Session::login(conn, username, password)? else {
        return Err(AppError::validation("invalid username or password"));
    };

    for (product_id, quantity) in parsed {
        session.add_to_cart(conn, product_id, quantity)?;
    }
    let placed = session.checkout(conn)?;
    session.logout();

    // The checkout made these views stale; show the refreshed queue length.
    let stats = reports::dashboard_stats(conn)?;

    out.emit(&placed, |out| {
        let rows = placed
            .lines
            .iter()
            .map(|l| {
                vec![
                    l.name().to_string(),
                    l.quantity().to_string(),
                    out.money(l.unit_price()),
                    out.money(l.subtotal()),
                ]
            })
            .collect();
        out.table(&["Item", "Qty", "Price", "Subtotal"], rows);
        out.message(&format!(
            "Order #{} saved, total {}. {} order(s) now pending.",
            placed.order.id,
            out.money(placed.total),
            stats.pending_count
        ));
    })
}

pub fn list(
    conn: &mut SqliteConnection,
    out: &Output,
    status: Option<OrderStatus>,
) -> Result<(), AppError> {
    let orders = orders::list_orders(conn, status)?;
    out.emit(&orders, |out| out.table(&SUMMARY_HEADERS, summary_rows(out, &orders)))
}

pub fn kitchen(conn: &mut SqliteConnection, out: &Output) -> Result<(), AppError> {
    let queue = orders::kitchen_queue(conn)?;
    out.emit(&queue, |out| out.table(&SUMMARY_HEADERS, summary_rows(out, &queue)))
}

pub fn complete(conn: &mut SqliteConnection, out: &Output, order_id: i32) -> Result<(), AppError> {
    let order = orders::complete_order(conn, order_id)?;
    out.emit(&order, |out| out.message(&format!("Order #{} completed", order.id)))
}

pub fn delete(
    conn: &mut SqliteConnection,
    out: &Output,
    order_id: i32,
    confirmed: bool,
) -> Result<(), AppError> {
    if !confirmed {
        eprintln!("Order #{order_id} was not deleted; pass --yes to delete it permanently.");
        return Ok(());
    }
    let deleted = orders::delete_order(conn, order_id)?;
    out.emit(&deleted, |out| {
        out.message(&format!(
            "Order #{} deleted ({} line item(s) removed)",
            deleted.order.id, deleted.items_removed
        ))
    })
}

#[derive(Serialize)]
struct Receipt {
    order: OrderSummary,
    lines: Vec<ReceiptLine>,
}

pub fn receipt(conn: &mut SqliteConnection, out: &Output, order_id: i32) -> Result<(), AppError> {
    let order = orders::get_order(conn, order_id)?;
    let lines = orders::get_order_items(conn, order_id)?;
    let receipt = Receipt { order, lines };

    out.emit(&receipt, |out| {
        out.message(&format!(
            "Order #{} by {} on {} ({})",
            receipt.order.id, receipt.order.cashier, receipt.order.created_at, receipt.order.status
        ));
        let rows = receipt
            .lines
            .iter()
            .map(|l| {
                vec![
                    l.quantity.to_string(),
                    l.product_name.clone(),
                    out.money(l.unit_price),
                    out.money(l.subtotal),
                ]
            })
            .collect();
        out.table(&["Qty", "Item", "Price", "Subtotal"], rows);
        out.message(&format!("Total: {}", out.money(receipt.order.total)));
    })
}
