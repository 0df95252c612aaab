#[cfg(feature = "csv")]
/// This module provides the semicolon-separated CSV writer.
pub mod csv;

#[cfg(feature = "json")]
/// This module provides the JSON encode/decode helpers.
pub mod json;
