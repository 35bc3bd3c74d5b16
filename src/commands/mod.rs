pub mod accounts;
pub mod orders;
pub mod output;
pub mod products;
pub mod reports;
