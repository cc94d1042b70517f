//! Data models
//!
//! Rust structs representing database entities.

mod custom_unit;

pub use custom_unit::{CustomUnit, CustomUnitCreate, CustomUnitUpdate};
