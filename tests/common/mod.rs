mod mocks;

#[allow(unused_imports)]
pub use mocks::*;

use data_format_rs::core::query::Record;
use serde_json::{Value, json};

/// Two people sharing the same keys in the same order.
#[allow(dead_code)]
pub fn people() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Alice"}),
        json!({"id": 2, "name": "Bob"}),
    ]
}

#[allow(dead_code)]
pub fn records(rows: Vec<Value>) -> Vec<Record> {
    rows.into_iter()
        .filter_map(|row| match row {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}
