use serde_json::Value;

/// Returns the textual form of a leaf value.
///
/// Strings are returned as-is, numbers in their JSON form, booleans as
/// `true`/`false` and null as the empty string. Containers fall back to their
/// compact JSON text.
///
/// # Examples
///
/// ```
/// use data_format_rs::core::value::to_text;
/// use serde_json::json;
///
/// assert_eq!(to_text(&json!("Alice")), "Alice");
/// assert_eq!(to_text(&json!(42)), "42");
/// assert_eq!(to_text(&json!(1.5)), "1.5");
/// assert_eq!(to_text(&json!(true)), "true");
/// assert_eq!(to_text(&json!(null)), "");
/// assert_eq!(to_text(&json!([1, 2])), "[1,2]");
/// ```
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Returns true for arrays and objects.
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}
