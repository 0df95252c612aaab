use serde_json::{Map, Value};

/// A row exported as column name to value, in column order.
pub type Record = Map<String, Value>;

/// A query result able to export its rows as records.
///
/// This is the only part of a query layer the CSV writer relies on: the
/// query machinery itself lives with the caller.
///
/// # Examples
///
/// ```
/// use data_format_rs::core::query::{QueryResult, Record};
/// use serde_json::json;
///
/// struct Fixed(Vec<Record>);
///
/// impl QueryResult for Fixed {
///     fn records(&self) -> Vec<Record> {
///         self.0.clone()
///     }
/// }
///
/// let row = json!({"id": 1, "name": "Alice"}).as_object().cloned().unwrap();
/// let result = Fixed(vec![row]);
/// assert_eq!(result.records().len(), 1);
/// ```
pub trait QueryResult {
    /// Returns every row of the result, keyed by column name.
    fn records(&self) -> Vec<Record>;
}

impl QueryResult for Vec<Record> {
    fn records(&self) -> Vec<Record> {
        self.clone()
    }
}

impl QueryResult for [Record] {
    fn records(&self) -> Vec<Record> {
        self.to_vec()
    }
}
