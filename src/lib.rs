// bookstore order api

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod sql;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{Result, ShopError};
