//! SKM Tools module
//!
//! MCP tool implementations for the Smart Kitchen Manager unit converter.

pub mod conversions;
pub mod custom_units;
pub mod status;
