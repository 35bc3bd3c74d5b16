//! Input checks that run before any statement reaches the database.

use crate::{app_error::AppError, money::Money};

/// Largest quantity accepted for a single cart line.
pub const MAX_QUANTITY: i32 = 9999;

/// Returns the trimmed value, or a validation error naming `field`.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

pub fn parse_price(input: &str) -> Result<Money, AppError> {
    Money::parse(input)
}

pub fn parse_quantity(input: &str) -> Result<i32, AppError> {
    let trimmed = require("quantity", input)?;
    let quantity: i32 = trimmed
        .parse()
        .map_err(|_| AppError::validation(format!("'{trimmed}' is not a whole number")))?;
    check_quantity(quantity)
}

/// Range check for an amount that did not come through `Money::parse`.
pub fn check_price(price: Money) -> Result<Money, AppError> {
    if price < Money::ZERO {
        return Err(AppError::validation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    if price > Money::MAX_PRICE {
        return Err(AppError::validation(format!(
            "price exceeds maximum allowed ({}), got {price}",
            Money::MAX_PRICE
        )));
    }
    Ok(price)
}

pub fn check_quantity(quantity: i32) -> Result<i32, AppError> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(quantity)
}

/// A product form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image_path: Option<String>,
}

impl ProductForm {
    pub fn new(
        name: &str,
        description: &str,
        price: &str,
        image_path: Option<&str>,
    ) -> Result<Self, AppError> {
        let name = require("product name", name)?.to_string();
        let price = parse_price(price)?;
        let image_path = image_path
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(str::to_string);

        Ok(Self {
            name,
            description: description.trim().to_string(),
            price,
            image_path,
        })
    }
}

/// Username and password as typed at signup or login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> Credentials<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Result<Self, AppError> {
        let username = require("username", username)?;
        if password.is_empty() {
            return Err(AppError::validation("password is required"));
        }
        Ok(Self { username, password })
    }
}

impl std::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
