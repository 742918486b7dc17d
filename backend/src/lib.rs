//! Backend for a peer-to-peer clothing rental marketplace: catalog browsing,
//! item listings, orders with encrypted delivery and payment details, and
//! role-based access for admins, renters and users.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use error::AppError;
