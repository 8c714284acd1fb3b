pub mod bundles;
pub mod catalog;
pub mod connection;
pub mod consignment;
pub mod inspections;
pub mod lens_specs;
pub mod models;
pub mod pricing;
pub mod purchases;
pub mod redis;
pub mod vendors;
pub mod webhook_events;

pub use connection::DbClient;
