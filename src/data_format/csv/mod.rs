//! CSV export of tabular data.
//!
//! Rows are written through a [`csv::Writer`] with a fixed `;` separator, an
//! optional enclosure character (doubled inside fields) and a `\n` terminator. Text is
//! transliterated to Windows-1252 before it is written, so the files open
//! cleanly in spreadsheet applications configured for Western European locales.
//!
//! # Module Architecture
//!
//! 1. **CsvWriter**: holds the rows and the formatting flags, and writes them to
//!    a file (creating or appending), to a [`ResponseSink`](crate::core::response::ResponseSink)
//!    as a download, or to memory.
//!
//! 2. **windows1252**: the Unicode to code page table with its substitutions.
//!
//! # Examples
//!
//! ## Exporting records
//!
//! ```
//! use data_format_rs::data_format::csv::csv_writer::{CsvWriterBuilder, DEFAULT_ENCLOSURE};
//! use serde_json::json;
//!
//! let writer = CsvWriterBuilder::new().from_table(vec![
//!     json!({"city": "Boston", "pop": 4628910}),
//!     json!({"city": "Concord", "pop": 42695}),
//! ]);
//!
//! let data = String::from_utf8(writer.to_bytes(DEFAULT_ENCLOSURE).unwrap()).unwrap();
//! assert_eq!(
//!     data,
//!     "\"city\";\"pop\"\n\"Boston\";\"4628910\"\n\"Concord\";\"42695\"\n"
//! );
//! ```
//!
//! ## Exporting a query result
//!
//! ```
//! use data_format_rs::core::query::Record;
//! use data_format_rs::data_format::csv::csv_writer::CsvWriterBuilder;
//! use serde_json::json;
//!
//! let records: Vec<Record> = vec![
//!     json!({"id": 1, "label": "Crème"}).as_object().cloned().unwrap(),
//! ];
//!
//! let writer = CsvWriterBuilder::new().from_query_result(&records);
//! assert_eq!(writer.to_bytes(None).unwrap(), b"id;label\n1;Cr\xE8me\n");
//! ```

/// A module providing the CSV writer and its builder.
pub mod csv_writer;

/// A module providing the Windows-1252 transliteration table.
pub mod windows1252;
