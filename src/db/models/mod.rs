//! Database models and types module.
//! This module contains all the database-related structs, enums, and type definitions.

mod db_models; // Core database models
mod params; // Request payload models
mod responses; // API response models
mod status; // Lifecycle status enums

// Re-export all models for easier access
pub use db_models::*;
pub use params::*;
pub use responses::*;
pub use status::*;
