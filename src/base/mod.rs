//! Foundation helpers shared by every format plugin.
//!
//! - [`parse_int`], [`parse_long`], [`parse_decimal`] - tolerant numeric parsing
//! - [`TextEncoding`] - default code page for formats without an encoding marker
//!
//! This module has NO dependencies on other chanlist modules.

mod encoding;
mod number;

pub use encoding::TextEncoding;
pub use number::{parse_decimal, parse_int, parse_long};
