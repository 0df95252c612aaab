use std::io::{self, Stdout, Write};

use log::debug;

pub const CONTENT_TYPE: &str = "Content-Type";

pub const CONTENT_DISPOSITION: &str = "Content-Disposition";

/// Content type announced for CSV downloads, understood by spreadsheet applications.
pub const SPREADSHEET_CONTENT_TYPE: &str = "application/excel";

/// Builds the `Content-Disposition` value asking the client to save the body as `file_name`.
///
/// `"` and `\` in the name are backslash-escaped so the quoted string stays closed.
pub fn attachment(file_name: &str) -> String {
    let mut value = String::with_capacity(file_name.len() + 24);
    value.push_str("attachment; filename=\"");
    for ch in file_name.chars() {
        if matches!(ch, '"' | '\\') {
            value.push('\\');
        }
        value.push(ch);
    }
    value.push('"');
    value
}

/// Rejects header names or values that would break out of their line.
fn check_header(name: &str, value: &str) -> io::Result<()> {
    if name.is_empty() || name.contains([':', '\r', '\n']) || value.contains(['\r', '\n']) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid header {:?}: {:?}", name, value),
        ));
    }
    Ok(())
}

/// A response target: metadata headers followed by a body stream.
///
/// Headers must be set before the first byte of the body is written.
pub trait ResponseSink: Write {
    fn set_header(&mut self, name: &str, value: &str) -> io::Result<()>;
}

/// Response written to a raw byte stream as a CGI-style header block.
///
/// Headers are held back until the first body write (or flush), then emitted
/// as `Name: value\r\n` lines followed by a blank line.
pub struct StreamResponse<W: Write> {
    stream: W,
    headers: Vec<(String, String)>,
    headers_sent: bool,
}

/// The process standard output as a response target.
pub type StdoutResponse = StreamResponse<Stdout>;

impl StreamResponse<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StreamResponse<W> {
    pub fn new(stream: W) -> Self {
        Self {
            stream,
            headers: Vec::new(),
            headers_sent: false,
        }
    }

    fn send_headers(&mut self) -> io::Result<()> {
        if self.headers_sent {
            return Ok(());
        }
        for (name, value) in &self.headers {
            write!(self.stream, "{}: {}\r\n", name, value)?;
        }
        self.stream.write_all(b"\r\n")?;
        self.headers_sent = true;
        debug!("Response headers sent: {}", self.headers.len());
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl<W: Write> Write for StreamResponse<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send_headers()?;
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_headers()?;
        self.stream.flush()
    }
}

impl<W: Write> ResponseSink for StreamResponse<W> {
    fn set_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        if self.headers_sent {
            return Err(io::Error::other(format!(
                "header {} set after the body was started",
                name
            )));
        }
        check_header(name, value)?;
        self.headers.push((name.to_string(), value.to_string()));
        Ok(())
    }
}

/// In-memory response, for handing headers and body to a web framework.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use data_format_rs::core::response::{BufferedResponse, ResponseSink};
///
/// let mut response = BufferedResponse::new();
/// response.set_header("Content-Type", "text/plain").unwrap();
/// response.write_all(b"hello").unwrap();
///
/// assert_eq!(response.header("content-type"), Some("text/plain"));
/// assert_eq!(response.body(), b"hello");
/// ```
#[derive(Debug, Default)]
pub struct BufferedResponse {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks a header up by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl Write for BufferedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseSink for BufferedResponse {
    fn set_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        check_header(name, value)?;
        self.headers.push((name.to_string(), value.to_string()));
        Ok(())
    }
}
