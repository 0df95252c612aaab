use std::{io, path::PathBuf};

use thiserror::Error;

#[cfg(feature = "json")]
use crate::data_format::json::json_codec::JsonError;

#[derive(Error, Debug)]
/// Data format error
pub enum DataFormatError {
    #[error("No CSV data to export")]
    NoData,

    #[error("File {} could not be opened for writing: {}", path.display(), source)]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] JsonError),
}
