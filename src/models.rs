use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use diesel::{
    AsExpression, FromSqlRow, Selectable,
    backend::Backend,
    deserialize::{self, FromSql},
    prelude::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName},
    serialize::{self, Output, ToSql},
    sql_types::{BigInt, Integer, Text, Timestamp},
    sqlite::Sqlite,
};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Implements the `Text` column mapping for a fieldless enum with `as_str`
/// and `FromStr`.
macro_rules! text_enum_sql {
    ($ty:ty) => {
        impl ToSql<Text, Sqlite> for $ty {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
                out.set_value(self.as_str());
                Ok(serialize::IsNull::No)
            }
        }

        impl FromSql<Text, Sqlite> for $ty {
            fn from_sql(value: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
                let raw = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
                Ok(raw.parse::<$ty>()?)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

// Accounts

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, AsExpression, FromSqlRow, Serialize, Deserialize,
)]
#[diesel(sql_type = Text)]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            _ => Err(UnknownVariant {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

text_enum_sql!(Role);

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountEntity {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::accounts)]
pub struct CreateAccountEntity<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

/// Account row without credentials, for staff listings and sessions.
#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountSummary {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl From<AccountEntity> for AccountSummary {
    fn from(account: AccountEntity) -> Self {
        Self {
            id: account.id,
            username: account.username,
            role: account.role,
        }
    }
}

// Products

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductEntity {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[diesel(column_name = price_cents)]
    pub price: Money,
    pub image_path: Option<String>,
}

/// Column values written by both product insert and product update.
#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductFormEntity<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[diesel(column_name = price_cents)]
    pub price: Money,
    pub image_path: Option<&'a str>,
}

// Orders

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize,
    Deserialize,
)]
#[diesel(sql_type = Text)]
pub enum OrderStatus {
    #[default]
    Pending,
    Complete,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Complete => "Complete",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "complete" => Ok(OrderStatus::Complete),
            _ => Err(UnknownVariant {
                kind: "order status",
                value: s.to_string(),
            }),
        }
    }
}

text_enum_sql!(OrderStatus);

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderEntity {
    pub id: i32,
    pub account_id: i32,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::orders)]
pub struct CreateOrderEntity {
    pub account_id: i32,
    pub status: OrderStatus,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItemEntity {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[diesel(column_name = unit_price_cents)]
    pub unit_price: Money,
}

impl OrderItemEntity {
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::order_items)]
pub struct CreateOrderItemEntity {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[diesel(column_name = unit_price_cents)]
    pub unit_price: Money,
}

/// One line of an order about to be created. The unit price is the price
/// captured when the line was put in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Money,
}

// Read models

/// An order row as shown in the kitchen queue and order listings.
#[derive(Serialize, Debug, Clone)]
pub struct OrderSummary {
    pub id: i32,
    pub cashier: String,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub total: Money,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Money,
    pub subtotal: Money,
}

#[derive(Serialize, Debug)]
pub struct DeletedOrder {
    pub order: OrderEntity,
    pub items_removed: usize,
}

#[derive(QueryableByName, Serialize, Debug, Clone)]
pub struct SalesHistoryRow {
    #[diesel(sql_type = Integer)]
    pub order_id: i32,
    #[diesel(sql_type = Text)]
    pub cashier: String,
    #[diesel(sql_type = Timestamp)]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = BigInt)]
    pub total: Money,
    #[diesel(sql_type = BigInt)]
    pub item_count: i64,
}

#[derive(QueryableByName, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    #[diesel(sql_type = BigInt)]
    pub revenue: Money,
    #[diesel(sql_type = BigInt)]
    pub order_count: i64,
    #[diesel(sql_type = BigInt)]
    pub pending_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("Complete".parse::<OrderStatus>().unwrap(), OrderStatus::Complete);
        assert!("done".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_round_trips_through_its_column_text() {
        for status in [OrderStatus::Pending, OrderStatus::Complete] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn role_defaults_to_staff() {
        assert_eq!(Role::default(), Role::Staff);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        let err = "owner".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "unknown role 'owner'");
    }

    #[test]
    fn order_item_subtotal_uses_captured_price() {
        let item = OrderItemEntity {
            id: 1,
            order_id: 1,
            product_id: 1,
            quantity: 3,
            unit_price: Money::from_cents(150),
        };
        assert_eq!(item.subtotal(), Money::from_cents(450));
    }
}
