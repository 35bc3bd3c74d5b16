//! Persistence access. Every function takes the connection explicitly and
//! runs synchronously; multi-statement writes run in one transaction.

pub mod accounts;
pub mod orders;
pub mod products;
pub mod reports;
