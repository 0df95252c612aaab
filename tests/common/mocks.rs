//! Mocks for the collaborators of the CSV writer.
use mockall::mock;

use std::io::{self, Write};

use data_format_rs::core::{
    query::{QueryResult, Record},
    response::ResponseSink,
};

mock! {
    pub Query {}
    impl QueryResult for Query {
        fn records(&self) -> Vec<Record>;
    }
}

mock! {
    pub Response {}
    impl Write for Response {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
    impl ResponseSink for Response {
        fn set_header(&mut self, name: &str, value: &str) -> io::Result<()>;
    }
}
