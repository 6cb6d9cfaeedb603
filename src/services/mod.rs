pub mod catalog;
pub mod requests;
pub mod stock;
pub mod users;
