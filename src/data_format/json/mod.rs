//! JSON encoding and decoding.
//!
//! Thin layer over `serde_json` (with `preserve_order`, so object keys keep
//! their document order) adding:
//!
//! - a *stringify* encoding mode, where every leaf value is turned into text
//!   and quotes and angle brackets are hex-escaped for inline embedding;
//! - classified decode errors ([`JsonErrorCode`](json_codec::JsonErrorCode))
//!   returned alongside the result rather than kept in shared state;
//! - [`JsonDecoder`](json_codec::JsonDecoder), which remembers the error of
//!   its last call for callers that prefer checking after the fact.
//!
//! # Examples
//!
//! ```
//! use data_format_rs::data_format::json::json_codec::{decode, encode, JsonErrorCode};
//! use serde_json::json;
//!
//! let text = encode(&json!({"name": "<Alice>", "age": 30}), true).unwrap();
//! assert_eq!(text, r#"{"name":"\u003CAlice\u003E","age":"30"}"#);
//!
//! // Decoding gives back the escaped characters
//! assert_eq!(decode(&text).unwrap(), json!({"name": "<Alice>", "age": "30"}));
//!
//! assert_eq!(decode("[1,").unwrap_err().code(), JsonErrorCode::Syntax);
//! ```

/// A module providing the JSON codec.
pub mod json_codec;
