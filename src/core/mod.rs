/// Scalar to text conversion shared by the CSV writer and the JSON codec.
pub mod value;

/// The query-result collaborator a CSV writer can be populated from.
pub mod query;

/// Response targets: header block plus body stream.
pub mod response;
