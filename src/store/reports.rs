use anyhow::Context;
use diesel::{RunQueryDsl, SqliteConnection, sql_query, sql_types::Text};

use crate::{
    app_error::AppError,
    models::{DashboardStats, OrderStatus, SalesHistoryRow},
};

/// Completed orders with their recomputed totals and line-item counts.
///
/// The LEFT JOIN keeps orders that somehow lost their items; they show a
/// zero total and zero count instead of disappearing.
pub fn sales_history(conn: &mut SqliteConnection) -> Result<Vec<SalesHistoryRow>, AppError> {
    let rows: Vec<SalesHistoryRow> = sql_query(
        "SELECT o.id AS order_id,
                a.username AS cashier,
                o.created_at AS created_at,
                COALESCE(SUM(oi.quantity * oi.unit_price_cents), 0) AS total,
                COUNT(oi.id) AS item_count
         FROM orders o
         JOIN accounts a ON a.id = o.account_id
         LEFT JOIN order_items oi ON oi.order_id = o.id
         WHERE o.status = ?
         GROUP BY o.id, a.username, o.created_at
         ORDER BY o.id DESC",
    )
    .bind::<Text, _>(OrderStatus::Complete)
    .load(conn)
    .context("Failed to get sales history")?;

    Ok(rows)
}

/// Revenue across every recorded line item plus order counts.
pub fn dashboard_stats(conn: &mut SqliteConnection) -> Result<DashboardStats, AppError> {
    let stats: DashboardStats = sql_query(
        "SELECT COALESCE((SELECT SUM(quantity * unit_price_cents) FROM order_items), 0) AS revenue,
                (SELECT COUNT(*) FROM orders) AS order_count,
                (SELECT COUNT(*) FROM orders WHERE status = ?) AS pending_count",
    )
    .bind::<Text, _>(OrderStatus::Pending)
    .get_result(conn)
    .context("Failed to get dashboard stats")?;

    Ok(stats)
}
