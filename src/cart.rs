//! The in-memory cart a cashier builds before checkout.
//!
//! Nothing here touches the database. Each line captures the product's price
//! at the moment it was added; that captured price is what the order records.

use serde::Serialize;

use crate::{
    app_error::AppError,
    models::{NewOrderLine, ProductEntity},
    money::Money,
    validation::check_quantity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CartState {
    Empty,
    Building,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    product_id: i32,
    name: String,
    unit_price: Money,
    quantity: i32,
    subtotal: Money,
}

impl CartLine {
    fn new(product: &ProductEntity, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            subtotal: product.price.times(quantity),
        }
    }

    pub fn product_id(&self) -> i32 {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
        self.subtotal = self.unit_price.times(quantity);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CartState {
        if self.lines.is_empty() {
            CartState::Empty
        } else {
            CartState::Building
        }
    }

    /// Appends a new line, even when the product is already in the cart.
    pub fn add_line(
        &mut self,
        product: &ProductEntity,
        quantity: i32,
    ) -> Result<&CartLine, AppError> {
        let quantity = check_quantity(quantity)?;
        let index = self.lines.len();
        self.lines.push(CartLine::new(product, quantity));
        Ok(&self.lines[index])
    }

    /// Changes the quantity of the line at `index` and recomputes its subtotal.
    pub fn update_quantity(&mut self, index: usize, quantity: i32) -> Result<&CartLine, AppError> {
        let quantity = check_quantity(quantity)?;
        let line = self
            .lines
            .get_mut(index)
            .ok_or(AppError::NoSuchCartLine(index))?;
        line.set_quantity(quantity);
        Ok(line)
    }

    pub fn remove_line(&mut self, index: usize) -> Result<CartLine, AppError> {
        if index >= self.lines.len() {
            return Err(AppError::NoSuchCartLine(index));
        }
        Ok(self.lines.remove(index))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Empties the cart and hands back what was in it.
    pub fn take_lines(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    pub fn to_order_lines(&self) -> Vec<NewOrderLine> {
        self.lines
            .iter()
            .map(|line| NewOrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str, price: &str) -> ProductEntity {
        ProductEntity {
            id,
            name: name.to_string(),
            description: String::new(),
            price: Money::parse(price).unwrap(),
            image_path: None,
        }
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new();
        assert_eq!(cart.state(), CartState::Empty);
        assert_eq!(cart.total(), Money::ZERO);
        assert!(cart.to_order_lines().is_empty());
    }

    #[test]
    fn single_line_subtotal_is_price_times_quantity() {
        let latte = product(1, "Latte", "120.00");
        let mut cart = Cart::new();

        let line = cart.add_line(&latte, 2).unwrap();
        assert_eq!(line.subtotal(), Money::parse("240.00").unwrap());
        assert_eq!(cart.state(), CartState::Building);
        assert_eq!(cart.total(), Money::parse("240.00").unwrap());
    }

    #[test]
    fn subtotal_matches_for_a_range_of_prices_and_quantities() {
        for (price, quantity) in [("0", 1), ("0.01", 9999), ("3.50", 3), ("99.99", 7)] {
            let item = product(1, "Item", price);
            let mut cart = Cart::new();
            let line = cart.add_line(&item, quantity).unwrap();
            assert_eq!(line.subtotal(), item.price.times(quantity));
        }
    }

    #[test]
    fn add_line_returns_the_new_line() {
        let latte = product(1, "Latte", "120");
        let mocha = product(2, "Mocha", "95");
        let mut cart = Cart::new();
        cart.add_line(&latte, 1).unwrap();

        let line = cart.add_line(&mocha, 3).unwrap();
        assert_eq!(line.name(), "Mocha");
        assert_eq!(line.quantity(), 3);
    }

    #[test]
    fn adding_the_same_product_twice_appends() {
        let latte = product(1, "Latte", "120");
        let mut cart = Cart::new();
        cart.add_line(&latte, 1).unwrap();
        cart.add_line(&latte, 1).unwrap();
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn rejects_non_positive_quantities() {
        let latte = product(1, "Latte", "120");
        let mut cart = Cart::new();
        assert!(matches!(cart.add_line(&latte, 0), Err(AppError::Validation(_))));
        assert!(matches!(cart.add_line(&latte, -2), Err(AppError::Validation(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_recomputes_subtotal() {
        let latte = product(1, "Latte", "120");
        let mocha = product(2, "Mocha", "95.50");
        let mut cart = Cart::new();
        cart.add_line(&latte, 1).unwrap();
        cart.add_line(&mocha, 1).unwrap();

        let line = cart.update_quantity(1, 4).unwrap();
        assert_eq!(line.quantity(), 4);
        assert_eq!(line.subtotal(), Money::parse("382.00").unwrap());
        assert_eq!(cart.total(), Money::parse("502.00").unwrap());

        assert!(matches!(cart.update_quantity(5, 1), Err(AppError::NoSuchCartLine(5))));
        assert!(matches!(cart.update_quantity(0, 0), Err(AppError::Validation(_))));
        assert_eq!(cart.lines()[0].quantity(), 1);
    }

    #[test]
    fn remove_line_by_position() {
        let latte = product(1, "Latte", "120");
        let mocha = product(2, "Mocha", "95");
        let mut cart = Cart::new();
        cart.add_line(&latte, 1).unwrap();
        cart.add_line(&mocha, 2).unwrap();

        let removed = cart.remove_line(0).unwrap();
        assert_eq!(removed.name(), "Latte");
        assert_eq!(cart.lines()[0].name(), "Mocha");
        assert!(matches!(cart.remove_line(3), Err(AppError::NoSuchCartLine(3))));

        cart.remove_line(0).unwrap();
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[test]
    fn captured_price_survives_product_changes() {
        let mut latte = product(1, "Latte", "120");
        let mut cart = Cart::new();
        cart.add_line(&latte, 2).unwrap();

        latte.price = Money::parse("150").unwrap();
        let lines = cart.to_order_lines();
        assert_eq!(lines[0].unit_price, Money::parse("120").unwrap());
    }

    #[test]
    fn take_lines_empties_the_cart() {
        let latte = product(1, "Latte", "120");
        let mut cart = Cart::new();
        cart.add_line(&latte, 2).unwrap();

        let taken = cart.take_lines();
        assert_eq!(taken.len(), 1);
        assert!(cart.is_empty());
    }
}
