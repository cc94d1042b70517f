//! Unit conversion module
//!
//! Kitchen unit table, registry, conversion engine and converter state.

pub mod converter;
pub mod format;
pub mod registry;
pub mod session;
pub mod units;

pub use converter::{
    convert, convert_for_display, convert_request, convert_value, parse_quantity,
    ConversionError, ConversionRequest, ConversionResult,
};
pub use format::{clipboard_text, format_quantity};
pub use registry::{builtin_registry, RegistryError, UnitRegistry};
pub use session::ConverterState;
pub use units::{Category, Unit, UnitSource, BUILTIN_UNITS};
