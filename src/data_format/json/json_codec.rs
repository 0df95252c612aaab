use std::{fmt, io};

use log::{debug, warn};
use serde::Serialize;
use serde_json::{
    Serializer, Value,
    error::Category,
    ser::{CharEscape, CompactFormatter, Formatter},
};
use thiserror::Error;

use crate::{
    DataFormatError,
    core::value::{is_container, to_text},
};

/// Nesting limit applied by [`decode`] and a default [`JsonDecoder`].
///
/// The parser itself stops at [`PARSER_DEPTH_LIMIT`], which caps any limit
/// chosen here.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Nesting at which serde_json gives up, whatever `max_depth` says.
/// Documents nested this deep or deeper always fail with [`JsonErrorCode::Depth`].
pub const PARSER_DEPTH_LIMIT: usize = 128;

/// Kind of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonErrorCode {
    None,
    Depth,
    StateMismatch,
    CtrlChar,
    Syntax,
    Utf8,
    Unknown,
}

impl JsonErrorCode {
    /// Stable numeric code. `Unknown` is negative.
    pub fn code(self) -> i32 {
        match self {
            JsonErrorCode::None => 0,
            JsonErrorCode::Depth => 1,
            JsonErrorCode::StateMismatch => 2,
            JsonErrorCode::CtrlChar => 3,
            JsonErrorCode::Syntax => 4,
            JsonErrorCode::Utf8 => 5,
            JsonErrorCode::Unknown => -1,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            JsonErrorCode::None => "No error",
            JsonErrorCode::Depth => "Maximum stack depth exceeded",
            JsonErrorCode::StateMismatch => "State mismatch (invalid or malformed JSON)",
            JsonErrorCode::CtrlChar => "Control character error, possibly incorrectly encoded",
            JsonErrorCode::Syntax => "Syntax error",
            JsonErrorCode::Utf8 => "Malformed UTF-8 characters, possibly incorrectly encoded",
            JsonErrorCode::Unknown => "Unknown error",
        }
    }
}

impl fmt::Display for JsonErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.description())
    }
}

/// A failed decode: its kind plus the parser message and position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code} ({message})")]
pub struct JsonError {
    code: JsonErrorCode,
    message: String,
    line: usize,
    column: usize,
}

impl JsonError {
    fn new(code: JsonErrorCode, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            code,
            message: message.into(),
            line,
            column,
        }
    }

    fn from_parser(text: &str, error: &serde_json::Error) -> Self {
        let message = error.to_string();
        let code = match error.classify() {
            Category::Syntax | Category::Eof => {
                if message.starts_with("recursion limit exceeded") {
                    JsonErrorCode::Depth
                } else if message.starts_with("control character") {
                    JsonErrorCode::CtrlChar
                } else if message.starts_with("invalid unicode code point")
                    || message.starts_with("lone leading surrogate")
                    || message.starts_with("unexpected end of hex escape")
                {
                    JsonErrorCode::Utf8
                } else if is_mismatched_close(text, &message, error.line(), error.column()) {
                    JsonErrorCode::StateMismatch
                } else {
                    JsonErrorCode::Syntax
                }
            }
            Category::Data | Category::Io => JsonErrorCode::Unknown,
        };
        Self::new(code, message, error.line(), error.column())
    }

    pub fn code(&self) -> JsonErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based line of the failure, 0 when unknown.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the failure, 0 when unknown.
    pub fn column(&self) -> usize {
        self.column
    }

    /// `"<code> - <description>"`, e.g. `"4 - Syntax error"`.
    pub fn verbose(&self) -> String {
        self.code.to_string()
    }
}

/// True when the parser stopped on a closing delimiter of the other kind,
/// as in `[1}` or `{"a":1]`.
fn is_mismatched_close(text: &str, message: &str, line: usize, column: usize) -> bool {
    let expected = if message.starts_with("expected `,` or `]`") {
        b'}'
    } else if message.starts_with("expected `,` or `}`") {
        b']'
    } else {
        return false;
    };
    line.checked_sub(1)
        .and_then(|index| text.split('\n').nth(index))
        .zip(column.checked_sub(1))
        .and_then(|(line, index)| line.as_bytes().get(index))
        .is_some_and(|&byte| byte == expected)
}

/// Encodes `data` as JSON.
///
/// With `stringify_all`, every leaf is first replaced by its text (see
/// [`to_text`]) and `"`, `<` and `>` inside strings are written as
/// `\u0022`, `\u003C` and `\u003E` so the output can be embedded in markup.
///
/// # Examples
///
/// ```
/// use data_format_rs::data_format::json::json_codec::encode;
/// use serde_json::json;
///
/// let data = json!({"a": 1, "b": [true, null]});
/// assert_eq!(encode(&data, false).unwrap(), r#"{"a":1,"b":[true,null]}"#);
/// assert_eq!(encode(&data, true).unwrap(), r#"{"a":"1","b":["true",""]}"#);
/// ```
///
/// # Errors
///
/// [`DataFormatError::Json`] when `data` cannot be represented as JSON, for
/// instance a map with non-string keys.
pub fn encode<T: Serialize + ?Sized>(data: &T, stringify_all: bool) -> Result<String, DataFormatError> {
    if !stringify_all {
        return serde_json::to_string(data).map_err(|error| encode_error(&error));
    }

    let value = serde_json::to_value(data).map_err(|error| encode_error(&error))?;
    let value = stringify(value);

    let mut output = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut output, MarkupSafeFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|error| encode_error(&error))?;

    debug!("JSON encoded with stringified leaves: {} bytes", output.len());
    String::from_utf8(output)
        .map_err(|error| JsonError::new(JsonErrorCode::Utf8, error.to_string(), 0, 0).into())
}

fn encode_error(error: &serde_json::Error) -> DataFormatError {
    JsonError::new(
        JsonErrorCode::Unknown,
        error.to_string(),
        error.line(),
        error.column(),
    )
    .into()
}

/// Replaces every leaf of `value` by its text, keeping containers intact.
pub fn stringify(value: Value) -> Value {
    match value {
        Value::Array(values) => Value::Array(values.into_iter().map(stringify).collect()),
        Value::Object(record) => Value::Object(
            record
                .into_iter()
                .map(|(key, value)| (key, stringify(value)))
                .collect(),
        ),
        leaf => Value::String(to_text(&leaf)),
    }
}

/// Compact output with quotes and angle brackets in strings hex-escaped.
struct MarkupSafeFormatter;

impl Formatter for MarkupSafeFormatter {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        for (i, byte) in bytes.iter().enumerate() {
            let escaped: &[u8] = match byte {
                b'<' => b"\\u003C",
                b'>' => b"\\u003E",
                _ => continue,
            };
            writer.write_all(&bytes[start..i])?;
            writer.write_all(escaped)?;
            start = i + 1;
        }
        writer.write_all(&bytes[start..])
    }

    fn write_char_escape<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        char_escape: CharEscape,
    ) -> io::Result<()> {
        match char_escape {
            CharEscape::Quote => writer.write_all(b"\\u0022"),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

/// Decodes JSON text, keeping object keys in document order.
///
/// # Examples
///
/// ```
/// use data_format_rs::data_format::json::json_codec::{decode, JsonErrorCode};
/// use serde_json::json;
///
/// assert_eq!(decode("{}").unwrap(), json!({}));
///
/// let error = decode("not json").unwrap_err();
/// assert_eq!(error.code(), JsonErrorCode::Syntax);
/// assert_eq!(error.verbose(), "4 - Syntax error");
/// ```
pub fn decode(text: &str) -> Result<Value, JsonError> {
    decode_with_depth(text, DEFAULT_MAX_DEPTH)
}

/// Decodes JSON text, rejecting documents nested deeper than `max_depth`.
///
/// Scalars have depth 0 and each enclosing array or object adds one. The
/// effective limit is the smaller of `max_depth` and [`PARSER_DEPTH_LIMIT`] - 1.
pub fn decode_with_depth(text: &str, max_depth: usize) -> Result<Value, JsonError> {
    let value = serde_json::from_str::<Value>(text).map_err(|error| {
        let error = JsonError::from_parser(text, &error);
        warn!("JSON decode failed: {}", error);
        error
    })?;

    let depth = nesting_depth(&value);
    if depth > max_depth {
        let error = JsonError::new(
            JsonErrorCode::Depth,
            format!("nesting depth {} exceeds {}", depth, max_depth),
            0,
            0,
        );
        warn!("JSON decode failed: {}", error);
        return Err(error);
    }

    Ok(value)
}

/// Decodes raw bytes. Invalid UTF-8 is reported as [`JsonErrorCode::Utf8`].
pub fn decode_slice(bytes: &[u8], max_depth: usize) -> Result<Value, JsonError> {
    let text = std::str::from_utf8(bytes).map_err(|error| {
        let valid = &bytes[..error.valid_up_to()];
        let line = valid.iter().filter(|&&byte| byte == b'\n').count() + 1;
        let column = valid.iter().rev().take_while(|&&byte| byte != b'\n').count() + 1;
        let error = JsonError::new(JsonErrorCode::Utf8, error.to_string(), line, column);
        warn!("JSON decode failed: {}", error);
        error
    })?;
    decode_with_depth(text, max_depth)
}

fn nesting_depth(value: &Value) -> usize {
    if !is_container(value) {
        return 0;
    }
    let children = match value {
        Value::Array(values) => values.iter().map(nesting_depth).max(),
        Value::Object(record) => record.values().map(nesting_depth).max(),
        _ => None,
    };
    1 + children.unwrap_or(0)
}

/// Decoder remembering the outcome of its last call.
///
/// Each instance keeps its own state: every decode overwrites it, and a
/// successful decode resets it to [`JsonErrorCode::None`].
///
/// # Examples
///
/// ```
/// use data_format_rs::data_format::json::json_codec::{JsonDecoder, JsonErrorCode};
///
/// let mut decoder = JsonDecoder::new();
/// assert!(decoder.decode("[1, 2").is_none());
/// assert_eq!(decoder.last_error_code(), JsonErrorCode::Syntax);
///
/// assert!(decoder.decode("[1, 2]").is_some());
/// assert_eq!(decoder.last_error_verbose(), "0 - No error");
/// ```
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    max_depth: usize,
    last_error: Option<JsonError>,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonDecoder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            last_error: None,
        }
    }

    pub fn decode(&mut self, text: &str) -> Option<Value> {
        let result = decode_with_depth(text, self.max_depth);
        self.remember(result)
    }

    pub fn decode_slice(&mut self, bytes: &[u8]) -> Option<Value> {
        let result = decode_slice(bytes, self.max_depth);
        self.remember(result)
    }

    fn remember(&mut self, result: Result<Value, JsonError>) -> Option<Value> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(error) => {
                self.last_error = Some(error);
                None
            }
        }
    }

    pub fn last_error(&self) -> Option<&JsonError> {
        self.last_error.as_ref()
    }

    pub fn last_error_code(&self) -> JsonErrorCode {
        self.last_error
            .as_ref()
            .map_or(JsonErrorCode::None, JsonError::code)
    }

    pub fn last_error_verbose(&self) -> String {
        self.last_error_code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn stringify_keeps_structure() {
        let value = json!({"n": [1, {"x": 2.5, "y": false}], "s": "t"});
        assert_eq!(
            stringify(value),
            json!({"n": ["1", {"x": "2.5", "y": "false"}], "s": "t"})
        );
    }

    #[test]
    fn stringify_scalar_root() {
        assert_eq!(stringify(json!(null)), json!(""));
        assert_eq!(stringify(json!(7)), json!("7"));
    }

    #[test]
    fn stringify_mode_hex_escapes_quotes_and_tags() -> Result<(), DataFormatError> {
        let data = json!({"html": "<b>\"x\"</b>"});
        assert_eq!(
            encode(&data, true)?,
            r#"{"html":"\u003Cb\u003E\u0022x\u0022\u003C/b\u003E"}"#
        );
        Ok(())
    }

    #[test]
    fn plain_mode_uses_standard_escaping() -> Result<(), DataFormatError> {
        let data = json!({"html": "<b>\"x\"</b>\n"});
        assert_eq!(encode(&data, false)?, r#"{"html":"<b>\"x\"</b>\n"}"#);
        Ok(())
    }

    #[test]
    fn stringify_mode_keeps_other_escapes() -> Result<(), DataFormatError> {
        assert_eq!(encode(&json!(["a\\b\tc"]), true)?, r#"["a\\b\tc"]"#);
        Ok(())
    }

    #[test]
    fn encode_serializable_types() -> Result<(), DataFormatError> {
        #[derive(Serialize)]
        struct Car {
            year: u16,
            make: &'static str,
        }
        let car = Car {
            year: 1948,
            make: "Porsche",
        };
        assert_eq!(encode(&car, false)?, r#"{"year":1948,"make":"Porsche"}"#);
        assert_eq!(encode(&car, true)?, r#"{"year":"1948","make":"Porsche"}"#);
        Ok(())
    }

    #[test]
    fn encode_rejects_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair");
        assert!(matches!(encode(&map, true), Err(DataFormatError::Json(_))));
    }

    #[test]
    fn decode_preserves_key_order() {
        let value = decode(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn decode_error_kinds() {
        let cases = [
            ("not json", JsonErrorCode::Syntax),
            ("", JsonErrorCode::Syntax),
            ("[1, 2", JsonErrorCode::Syntax),
            ("[1]]", JsonErrorCode::Syntax),
            ("[1}", JsonErrorCode::StateMismatch),
            (r#"{"a": 1]"#, JsonErrorCode::StateMismatch),
            ("[1 2]", JsonErrorCode::Syntax),
            ("\"a\u{1}b\"", JsonErrorCode::CtrlChar),
            (r#""\ud800""#, JsonErrorCode::Utf8),
        ];
        for (text, expected) in cases {
            assert_eq!(decode(text).unwrap_err().code(), expected, "{:?}", text);
        }
    }

    #[test]
    fn decode_reports_position() {
        let error = decode("{\n  \"a\": x\n}").unwrap_err();
        assert_eq!(error.code(), JsonErrorCode::Syntax);
        assert_eq!((error.line(), error.column()), (2, 8));
    }

    #[test]
    fn serde_recursion_limit_is_a_depth_error() {
        let text = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert_eq!(decode(&text).unwrap_err().code(), JsonErrorCode::Depth);
    }

    #[test]
    fn parser_limit_caps_larger_max_depth() {
        let nested = |depth: usize| format!("{}{}", "[".repeat(depth), "]".repeat(depth));

        assert!(decode_with_depth(&nested(100), 1000).is_ok());
        assert_eq!(
            decode_with_depth(&nested(PARSER_DEPTH_LIMIT + 50), 1000)
                .unwrap_err()
                .code(),
            JsonErrorCode::Depth
        );
        assert_eq!(
            decode_with_depth(&nested(100), 99).unwrap_err().code(),
            JsonErrorCode::Depth
        );
    }

    #[test]
    fn custom_depth_limit() {
        assert!(decode_with_depth("[[1]]", 2).is_ok());
        assert_eq!(
            decode_with_depth("[[1]]", 1).unwrap_err().code(),
            JsonErrorCode::Depth
        );
        assert!(decode_with_depth("1", 0).is_ok());
    }

    #[test]
    fn invalid_utf8_bytes() {
        let error = decode_slice(b"[\"a\xFFb\"]", DEFAULT_MAX_DEPTH).unwrap_err();
        assert_eq!(error.code(), JsonErrorCode::Utf8);
        assert_eq!((error.line(), error.column()), (1, 4));
        assert_eq!(
            decode_slice(b"[\"ok\"]", DEFAULT_MAX_DEPTH).unwrap(),
            json!(["ok"])
        );
    }

    #[test]
    fn verbose_messages() {
        assert_eq!(JsonErrorCode::None.to_string(), "0 - No error");
        assert_eq!(
            JsonErrorCode::Depth.to_string(),
            "1 - Maximum stack depth exceeded"
        );
        assert_eq!(JsonErrorCode::Unknown.to_string(), "-1 - Unknown error");
    }

    #[test]
    fn decoder_overwrites_last_error() {
        let mut decoder = JsonDecoder::with_max_depth(1);
        assert_eq!(decoder.last_error_code(), JsonErrorCode::None);

        assert_eq!(decoder.decode("[[1]]"), None);
        assert_eq!(decoder.last_error_code(), JsonErrorCode::Depth);

        assert_eq!(decoder.decode_slice(b"\xC3"), None);
        assert_eq!(decoder.last_error_code(), JsonErrorCode::Utf8);

        assert_eq!(decoder.decode("{}"), Some(json!({})));
        assert_eq!(decoder.last_error_code(), JsonErrorCode::None);
        assert!(decoder.last_error().is_none());
    }

    #[test]
    fn null_document_is_not_an_error() {
        let mut decoder = JsonDecoder::new();
        assert_eq!(decoder.decode("null"), Some(Value::Null));
        assert_eq!(decoder.last_error_code(), JsonErrorCode::None);
    }
}
