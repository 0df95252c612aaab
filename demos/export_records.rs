//! Decodes a JSON array of records and sends it to standard output as a CSV
//! download, header block included.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example export_records
//! ```
use data_format_rs::{
    DataFormatError,
    data_format::{
        csv::csv_writer::{CsvWriterBuilder, DEFAULT_ENCLOSURE},
        json::json_codec::{JsonDecoder, encode},
    },
};
use log::{error, info};
use serde_json::Value;

const CARS: &str = r#"[
    {"year": 1948, "make": "Porsche", "model": "356", "description": "Luxury sports car"},
    {"year": 2011, "make": "Peugeot", "model": "206+", "description": "City car"},
    {"year": 2012, "make": "Citroën", "model": "C4 Picasso", "description": "SUV"},
    {"year": 2021, "make": "Mazda", "model": "CX-30", "description": "SUV \"Compact\""}
]"#;

fn main() -> Result<(), DataFormatError> {
    env_logger::init();

    let mut decoder = JsonDecoder::new();
    let Some(Value::Array(rows)) = decoder.decode(CARS) else {
        error!("Unable to read cars: {}", decoder.last_error_verbose());
        return Ok(());
    };

    info!("Cars as text: {}", encode(&rows, true)?);

    let writer = CsvWriterBuilder::new().has_headers(true).from_table(rows);
    writer.output("cars.csv", DEFAULT_ENCLOSURE)
}
