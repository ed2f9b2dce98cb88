// Re-export modules for testing
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod queries;
pub mod report;
pub mod schema;
pub mod seed;

pub use crate::error::ApiError;
pub use crate::handlers::{gluten_free, health, list_allergens, list_products, products_pdf};
