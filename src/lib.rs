#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # Data format helpers

 Two independent helpers for moving tabular and structured data in and out
 of an application:

- **CsvWriter:** exports a table (records or positional rows, or the records
  of a query result) as semicolon-separated text encoded in Windows-1252,
  either to a file or as a spreadsheet download on a response stream.
- **JSON codec:** encodes any serializable value, optionally turning every
  leaf into text, and decodes JSON text with classified errors.

 ## Features

| **Feature** | **Description**                              |
|-------------|----------------------------------------------|
| csv         | Enables the CSV writer                       |
| json        | Enables the JSON codec                       |
| full        | Enables all available features (default)    |

 ## Getting Started

```rust
# use data_format_rs::{
#     data_format::csv::csv_writer::{CsvWriterBuilder, DEFAULT_ENCLOSURE},
#     data_format::json::json_codec::decode,
#     error::DataFormatError,
# };
# use std::env::temp_dir;
fn main() -> Result<(), DataFormatError> {
    let rows = decode(r#"[
        {"year": 1948, "make": "Porsche", "model": "356"},
        {"year": 2012, "make": "Citroën", "model": "C4 Picasso"}
    ]"#)?;

    let writer = CsvWriterBuilder::new()
        .has_headers(true)
        .from_table(rows.as_array().cloned().unwrap_or_default());

    let path = temp_dir().join("cars.csv");
    # let _ = std::fs::remove_file(&path);
    writer.write_to_file(&path, DEFAULT_ENCLOSURE)?;

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Collaborator interfaces and shared value helpers
pub mod core;

/// Error types for data format operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// CSV writer and JSON codec
pub mod data_format;
