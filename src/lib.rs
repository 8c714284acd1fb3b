//! Operations backend for a used-camera-equipment reseller: intake of
//! vendor offers, inspection sessions, pricing and payout quotes,
//! consignment tracking, catalog management with WooCommerce sync, and a
//! WhatsApp webhook for quote acceptance.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
pub mod schema;
pub mod services;
pub mod validation;

use config::Config;

/// Result type for API
pub type Result<T> = std::result::Result<T, errors::ApiError>;

/// Static configuration instance for the API
pub static CONFIG: once_cell::sync::Lazy<Config> = once_cell::sync::Lazy::new(|| {
    dotenv::dotenv().ok();
    envy::from_env::<Config>().expect("Failed to load configuration")
});
