use std::collections::HashMap;

use anyhow::Context;
use diesel::{
    Connection, ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper, SqliteConnection,
};
use tracing::{debug, info};

use crate::{
    app_error::AppError,
    models::{
        CreateOrderEntity, CreateOrderItemEntity, DeletedOrder, NewOrderLine, OrderEntity,
        OrderItemEntity, OrderStatus, OrderSummary, ReceiptLine,
    },
    money::Money,
    schema::{accounts, order_items, orders, products},
    validation::{check_price, check_quantity},
};

/// Create an order header and all of its line items in one transaction.
///
/// Input is checked before the transaction opens; if any insert fails nothing
/// is persisted.
pub fn create_order(
    conn: &mut SqliteConnection,
    account_id: i32,
    lines: &[NewOrderLine],
) -> Result<OrderEntity, AppError> {
    if lines.is_empty() {
        return Err(AppError::EmptyOrder);
    }
    for line in lines {
        check_quantity(line.quantity)?;
        check_price(line.unit_price)?;
    }

    let order = conn.transaction(|conn| {
        let order: OrderEntity = diesel::insert_into(orders::table)
            .values(CreateOrderEntity {
                account_id,
                status: OrderStatus::Pending,
            })
            .returning(OrderEntity::as_returning())
            .get_result(conn)
            .context("Failed to create order")?;

        for line in lines {
            diesel::insert_into(order_items::table)
                .values(CreateOrderItemEntity {
                    order_id: order.id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .execute(conn)
                .with_context(|| {
                    format!("Failed to add product #{} to order", line.product_id)
                })?;
        }

        Ok::<OrderEntity, AppError>(order)
    })?;

    info!(
        "Order #{} created by account #{} with {} line item(s)",
        order.id,
        account_id,
        lines.len()
    );
    Ok(order)
}

/// Totals per order, recomputed from the captured line prices.
fn order_totals(
    conn: &mut SqliteConnection,
    order_ids: &[i32],
) -> Result<HashMap<i32, Money>, AppError> {
    let items: Vec<OrderItemEntity> = order_items::table
        .filter(order_items::order_id.eq_any(order_ids))
        .select(OrderItemEntity::as_select())
        .load(conn)
        .context("Failed to get order items")?;

    let mut totals: HashMap<i32, Money> = HashMap::new();
    for item in &items {
        *totals.entry(item.order_id).or_default() += item.subtotal();
    }
    Ok(totals)
}

/// Fetch orders newest first, optionally only those in `status`.
///
/// Orders without line items report a total of zero.
pub fn list_orders(
    conn: &mut SqliteConnection,
    status: Option<OrderStatus>,
) -> Result<Vec<OrderSummary>, AppError> {
    let mut query = orders::table
        .inner_join(accounts::table)
        .select((OrderEntity::as_select(), accounts::username))
        .order_by(orders::id.desc())
        .into_boxed();

    if let Some(status) = status {
        query = query.filter(orders::status.eq(status));
    }

    let orders: Vec<(OrderEntity, String)> = query.load(conn).context("Failed to get orders")?;

    let order_ids: Vec<i32> = orders.iter().map(|(order, _)| order.id).collect();
    let totals = order_totals(conn, &order_ids)?;

    let summaries: Vec<OrderSummary> = orders
        .into_iter()
        .map(|(order, cashier)| OrderSummary {
            total: totals.get(&order.id).copied().unwrap_or_default(),
            id: order.id,
            cashier,
            status: order.status,
            created_at: order.created_at,
        })
        .collect();

    debug!("Loaded {} order(s) (status filter: {:?})", summaries.len(), status);
    Ok(summaries)
}

/// The kitchen queue: orders that are not yet complete.
pub fn kitchen_queue(conn: &mut SqliteConnection) -> Result<Vec<OrderSummary>, AppError> {
    list_orders(conn, Some(OrderStatus::Pending))
}

/// Fetch one order with its cashier and recomputed total.
pub fn get_order(conn: &mut SqliteConnection, id: i32) -> Result<OrderSummary, AppError> {
    let (order, cashier): (OrderEntity, String) = orders::table
        .inner_join(accounts::table)
        .filter(orders::id.eq(id))
        .select((OrderEntity::as_select(), accounts::username))
        .first(conn)?;

    let totals = order_totals(conn, &[order.id])?;

    Ok(OrderSummary {
        total: totals.get(&order.id).copied().unwrap_or_default(),
        id: order.id,
        cashier,
        status: order.status,
        created_at: order.created_at,
    })
}

pub fn set_order_status(
    conn: &mut SqliteConnection,
    id: i32,
    status: OrderStatus,
) -> Result<OrderEntity, AppError> {
    let order: OrderEntity = diesel::update(orders::table.find(id))
        .set(orders::status.eq(status))
        .returning(OrderEntity::as_returning())
        .get_result(conn)?;

    info!("Order #{} is now {}", order.id, order.status);
    Ok(order)
}

/// Mark an order as served. It leaves the kitchen queue and enters sales history.
pub fn complete_order(conn: &mut SqliteConnection, id: i32) -> Result<OrderEntity, AppError> {
    set_order_status(conn, id, OrderStatus::Complete)
}

/// Line items of one order for receipt display, in the order they were rung up.
///
/// An unknown order id yields an empty list.
pub fn get_order_items(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Vec<ReceiptLine>, AppError> {
    let rows: Vec<(OrderItemEntity, String)> = order_items::table
        .inner_join(products::table)
        .filter(order_items::order_id.eq(order_id))
        .select((OrderItemEntity::as_select(), products::name))
        .order_by(order_items::id.asc())
        .load(conn)
        .context("Failed to get order items")?;

    let lines = rows
        .into_iter()
        .map(|(item, product_name)| ReceiptLine {
            subtotal: item.subtotal(),
            product_id: item.product_id,
            product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
        .collect();

    Ok(lines)
}

/// Permanently delete an order, whatever its status.
///
/// Line items go first so the header delete never violates the
/// `order_items.order_id` reference; both happen in one transaction.
pub fn delete_order(conn: &mut SqliteConnection, id: i32) -> Result<DeletedOrder, AppError> {
    let deleted = conn.transaction(|conn| {
        let items_removed = diesel::delete(order_items::table.filter(order_items::order_id.eq(id)))
            .execute(conn)
            .context("Failed to delete order items")?;

        let order: OrderEntity = diesel::delete(orders::table.find(id))
            .returning(OrderEntity::as_returning())
            .get_result(conn)?;

        Ok::<DeletedOrder, AppError>(DeletedOrder {
            order,
            items_removed,
        })
    })?;

    info!(
        "Order #{} deleted along with {} line item(s)",
        deleted.order.id, deleted.items_removed
    );
    Ok(deleted)
}
