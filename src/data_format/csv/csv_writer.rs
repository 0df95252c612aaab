use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::Path,
};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::{debug, info};
use serde_json::Value;

use crate::{
    DataFormatError,
    core::{
        query::QueryResult,
        response::{
            CONTENT_DISPOSITION, CONTENT_TYPE, ResponseSink, SPREADSHEET_CONTENT_TYPE,
            StdoutResponse, attachment,
        },
        value::to_text,
    },
};

use super::windows1252;

/// Enclosure used when the caller has no preference.
pub const DEFAULT_ENCLOSURE: Option<u8> = Some(b'"');

/// Writes a table as semicolon-separated, Windows-1252 encoded text.
///
/// The writer is populated once, then written any number of times to files,
/// to a response, or to memory. A new populate call replaces the rows and
/// flags entirely.
///
/// In record mode the rows are objects and the header row is the keys of the
/// first row. Every row is expected to share those keys in the same order;
/// this is not checked. In positional mode the header row is the column
/// positions of the first row.
#[derive(Debug, Clone)]
pub struct CsvWriter {
    rows: Vec<Value>,
    use_headers: bool,
    record_mode: bool,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            use_headers: true,
            record_mode: true,
        }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `rows` and the formatting flags as given.
    pub fn populate_from_table(&mut self, rows: Vec<Value>, use_headers: bool, record_mode: bool) {
        debug!(
            "Populate CSV writer with {} rows (headers: {}, record mode: {})",
            rows.len(),
            use_headers,
            record_mode
        );
        self.rows = rows;
        self.use_headers = use_headers;
        self.record_mode = record_mode;
    }

    /// Stores the records exported by `result`. Always switches to record mode.
    pub fn populate_from_query_result<Q: QueryResult + ?Sized>(
        &mut self,
        result: &Q,
        use_headers: bool,
    ) {
        let rows = result.records().into_iter().map(Value::Object).collect();
        self.populate_from_table(rows, use_headers, true);
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn use_headers(&self) -> bool {
        self.use_headers
    }

    pub fn record_mode(&self) -> bool {
        self.record_mode
    }

    /// Writes the rows to `path`.
    ///
    /// A missing or empty file is created and, when headers are enabled,
    /// starts with the header row. Any other file is appended to without a
    /// header.
    ///
    /// # Errors
    ///
    /// [`DataFormatError::NoData`] when nothing was populated, checked before
    /// touching the file system. [`DataFormatError::FileOpen`] when the file
    /// cannot be opened for writing. [`DataFormatError::Io`] when a write fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use data_format_rs::data_format::csv::csv_writer::{CsvWriter, DEFAULT_ENCLOSURE};
    /// use serde_json::json;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let path = dir.path().join("people.csv");
    ///
    /// let mut writer = CsvWriter::new();
    /// writer.populate_from_table(
    ///     vec![json!({"id": 1, "name": "Alice"}), json!({"id": 2, "name": "Bob"})],
    ///     true,
    ///     true,
    /// );
    /// writer.write_to_file(&path, DEFAULT_ENCLOSURE).unwrap();
    ///
    /// let content = std::fs::read_to_string(&path).unwrap();
    /// assert_eq!(content, "\"id\";\"name\"\n\"1\";\"Alice\"\n\"2\";\"Bob\"\n");
    /// ```
    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        enclosure: Option<u8>,
    ) -> Result<(), DataFormatError> {
        self.check_data()?;

        let path = path.as_ref();
        let fresh = match fs::metadata(path) {
            Ok(metadata) => metadata.len() == 0,
            Err(_) => true,
        };
        debug!("CSV target {} is fresh: {}", path.display(), fresh);

        let data = self.encode_rows(enclosure, fresh && self.use_headers)?;

        let mut file = if fresh {
            File::create(path)
        } else {
            OpenOptions::new().append(true).open(path)
        }
        .map_err(|source| DataFormatError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        file.write_all(&data)?;
        file.flush()?;

        info!("{} CSV rows written to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Writes the rows as a download named `file_name` to `response`.
    ///
    /// Sets the spreadsheet content type and an attachment disposition, then
    /// writes the header row (when enabled) and the rows in a single write.
    ///
    /// # Examples
    ///
    /// ```
    /// use data_format_rs::core::response::BufferedResponse;
    /// use data_format_rs::data_format::csv::csv_writer::CsvWriter;
    /// use serde_json::json;
    ///
    /// let mut writer = CsvWriter::new();
    /// writer.populate_from_table(vec![json!(["a", 1])], false, false);
    ///
    /// let mut response = BufferedResponse::new();
    /// writer.write_to_response(&mut response, "export.csv", None).unwrap();
    ///
    /// assert_eq!(response.header("Content-Type"), Some("application/excel"));
    /// assert_eq!(response.body(), b"a;1\n");
    /// ```
    pub fn write_to_response<S: ResponseSink + ?Sized>(
        &self,
        response: &mut S,
        file_name: &str,
        enclosure: Option<u8>,
    ) -> Result<(), DataFormatError> {
        self.check_data()?;

        response.set_header(CONTENT_TYPE, SPREADSHEET_CONTENT_TYPE)?;
        response.set_header(CONTENT_DISPOSITION, &attachment(file_name))?;

        let data = self.encode_rows(enclosure, self.use_headers)?;
        response.write_all(&data)?;
        response.flush()?;

        info!("{} CSV rows sent as {}", self.rows.len(), file_name);
        Ok(())
    }

    /// Writes the rows as a download to the process standard output.
    pub fn output(&self, file_name: &str, enclosure: Option<u8>) -> Result<(), DataFormatError> {
        let mut response = StdoutResponse::stdout();
        self.write_to_response(&mut response, file_name, enclosure)
    }

    /// Returns the header row (when enabled) and the rows as encoded bytes.
    pub fn to_bytes(&self, enclosure: Option<u8>) -> Result<Vec<u8>, DataFormatError> {
        self.check_data()?;
        self.encode_rows(enclosure, self.use_headers)
    }

    fn check_data(&self) -> Result<(), DataFormatError> {
        if self.rows.is_empty() {
            return Err(DataFormatError::NoData);
        }
        Ok(())
    }

    fn encode_rows(
        &self,
        enclosure: Option<u8>,
        with_header: bool,
    ) -> Result<Vec<u8>, DataFormatError> {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(b';')
            .terminator(Terminator::Any(b'\n'))
            .flexible(true);
        match enclosure {
            Some(quote) => builder.quote(quote).quote_style(QuoteStyle::Always),
            None => builder.quote_style(QuoteStyle::Never),
        };
        let mut wtr = builder.from_writer(Vec::with_capacity(4096));

        if with_header {
            wtr.write_record(self.header_fields())?;
        }
        for row in &self.rows {
            wtr.write_record(row_fields(row))?;
        }

        wtr.into_inner()
            .map_err(|error| DataFormatError::Io(error.into_error()))
    }

    fn header_fields(&self) -> Vec<Vec<u8>> {
        let Some(first) = self.rows.first() else {
            return Vec::new();
        };
        match first {
            Value::Object(record) if self.record_mode => {
                record.keys().map(|key| windows1252::encode(key)).collect()
            }
            row => (0..field_count(row))
                .map(|position| position.to_string().into_bytes())
                .collect(),
        }
    }
}

/// Builds a populated [`CsvWriter`].
///
/// # Examples
///
/// ```
/// use data_format_rs::data_format::csv::csv_writer::CsvWriterBuilder;
/// use serde_json::json;
///
/// let writer = CsvWriterBuilder::new()
///     .has_headers(false)
///     .from_table(vec![json!({"city": "Zürich", "pop": 421878})]);
///
/// assert_eq!(writer.to_bytes(Some(b'"')).unwrap(), b"\"Z\xFCrich\";\"421878\"\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CsvWriterBuilder {
    has_headers: bool,
    record_mode: bool,
}

impl Default for CsvWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvWriterBuilder {
    pub fn new() -> CsvWriterBuilder {
        CsvWriterBuilder {
            has_headers: true,
            record_mode: true,
        }
    }

    pub fn has_headers(mut self, yes: bool) -> CsvWriterBuilder {
        self.has_headers = yes;
        self
    }

    pub fn record_mode(mut self, yes: bool) -> CsvWriterBuilder {
        self.record_mode = yes;
        self
    }

    pub fn from_table(self, rows: Vec<Value>) -> CsvWriter {
        let mut writer = CsvWriter::new();
        writer.populate_from_table(rows, self.has_headers, self.record_mode);
        writer
    }

    pub fn from_query_result<Q: QueryResult + ?Sized>(self, result: &Q) -> CsvWriter {
        let mut writer = CsvWriter::new();
        writer.populate_from_query_result(result, self.has_headers);
        writer
    }
}

fn field_count(row: &Value) -> usize {
    match row {
        Value::Object(record) => record.len(),
        Value::Array(values) => values.len(),
        _ => 1,
    }
}

fn row_fields(row: &Value) -> Vec<Vec<u8>> {
    match row {
        Value::Object(record) => record.values().map(field_bytes).collect(),
        Value::Array(values) => values.iter().map(field_bytes).collect(),
        scalar => vec![field_bytes(scalar)],
    }
}

fn field_bytes(value: &Value) -> Vec<u8> {
    match value {
        Value::String(text) => windows1252::encode(text),
        other => windows1252::encode(&to_text(other)),
    }
}
