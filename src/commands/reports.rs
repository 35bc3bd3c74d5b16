use cafe_pos::{app_error::AppError, store::reports};
use diesel::SqliteConnection;

use super::output::Output;

pub fn history(conn: &mut SqliteConnection, out: &Output) -> Result<(), AppError> {
    let history = reports::sales_history(conn)?;
    out.emit(&history, |out| {
        let rows = history
            .iter()
            .map(|h| {
                vec![
                    h.order_id.to_string(),
                    h.cashier.clone(),
                    out.money(h.total),
                    h.created_at.to_string(),
                    h.item_count.to_string(),
                ]
            })
            .collect();
        out.table(&["Order", "Cashier", "Total", "Date", "Items"], rows);
    })
}

pub fn stats(conn: &mut SqliteConnection, out: &Output) -> Result<(), AppError> {
    let stats = reports::dashboard_stats(conn)?;
    out.emit(&stats, |out| {
        out.table(
            &["Total revenue", "Total orders", "Pending"],
            vec![vec![
                out.money(stats.revenue),
                stats.order_count.to_string(),
                stats.pending_count.to_string(),
            ]],
        );
    })
}
