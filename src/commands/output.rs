use anyhow::Context;
use cafe_pos::{app_error::AppError, money::Money};
use serde::Serialize;

/// Renders command results either as aligned text tables or as JSON.
pub struct Output {
    json: bool,
    currency_symbol: String,
}

impl Output {
    pub fn new(json: bool, currency_symbol: &str) -> Self {
        Self {
            json,
            currency_symbol: currency_symbol.to_string(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount)
    }

    pub fn message(&self, text: &str) {
        if self.json {
            println!("{}", serde_json::json!({ "message": text }));
        } else {
            println!("{text}");
        }
    }

    /// Prints `value` as JSON in JSON mode; otherwise calls `render`.
    pub fn emit<T: Serialize>(&self, value: &T, render: impl FnOnce(&Self)) -> Result<(), AppError> {
        if self.json {
            let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
            println!("{json}");
        } else {
            render(self);
        }
        Ok(())
    }

    pub fn table(&self, headers: &[&str], rows: Vec<Vec<String>>) {
        if rows.is_empty() {
            println!("(none)");
            return;
        }

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        print_row(headers.iter().copied(), &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        print_row(rule.iter().map(String::as_str), &widths);
        for row in &rows {
            print_row(row.iter().map(String::as_str), &widths);
        }
    }
}

fn print_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    println!("{}", line.join("  ").trim_end());
}
