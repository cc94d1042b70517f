//! Smart Kitchen Manager (SKM) Library
//!
//! Kitchen unit conversion engine, custom unit storage and MCP tools.

pub mod build_info;
pub mod conversion;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
