//! The logged-in cashier and their cart.
//!
//! A `Session` exists from a successful login until `logout`; the cart lives
//! and dies with it.

use diesel::SqliteConnection;
use serde::Serialize;
use tracing::info;

use crate::{
    app_error::AppError,
    cart::{Cart, CartLine},
    models::{AccountSummary, OrderEntity},
    money::Money,
    store::{accounts, orders, products},
};

/// Read views that show order data and must be re-fetched after a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Dashboard,
    KitchenQueue,
    SalesHistory,
}

#[derive(Debug, Serialize)]
pub struct PlacedOrder {
    pub order: OrderEntity,
    pub lines: Vec<CartLine>,
    pub total: Money,
    /// Views that no longer reflect the database.
    pub stale_views: [View; 3],
}

#[derive(Debug)]
pub struct Session {
    account: AccountSummary,
    cart: Cart,
}

impl Session {
    pub fn start(account: AccountSummary) -> Self {
        Self {
            account,
            cart: Cart::new(),
        }
    }

    /// Returns `None` when the username or password does not match.
    pub fn login(
        conn: &mut SqliteConnection,
        username: &str,
        password: &str,
    ) -> Result<Option<Self>, AppError> {
        let account = accounts::authenticate(conn, username, password)?;
        Ok(account.map(|account| Self::start(account.into())))
    }

    pub fn account(&self) -> &AccountSummary {
        &self.account
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Looks up the product and appends it to the cart at its current price.
    pub fn add_to_cart(
        &mut self,
        conn: &mut SqliteConnection,
        product_id: i32,
        quantity: i32,
    ) -> Result<&CartLine, AppError> {
        let product = products::get_product(conn, product_id)?;
        self.cart.add_line(&product, quantity)
    }

    /// Submits the cart as one order.
    ///
    /// On success the cart is empty again. On failure nothing was written and
    /// the cart is left as it was so the cashier can retry.
    pub fn checkout(&mut self, conn: &mut SqliteConnection) -> Result<PlacedOrder, AppError> {
        if self.cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let order = orders::create_order(conn, self.account.id, &self.cart.to_order_lines())?;
        let total = self.cart.total();
        let lines = self.cart.take_lines();

        info!(
            "{} checked out order #{} ({} line(s), total {})",
            self.account.username,
            order.id,
            lines.len(),
            total
        );

        Ok(PlacedOrder {
            order,
            lines,
            total,
            stale_views: [View::Dashboard, View::KitchenQueue, View::SalesHistory],
        })
    }

    /// Ends the session. Anything left in the cart is discarded.
    pub fn logout(self) -> AccountSummary {
        if !self.cart.is_empty() {
            info!(
                "{} logged out with {} unsubmitted cart line(s)",
                self.account.username,
                self.cart.len()
            );
        }
        self.account
    }
}
