//! Outbound response model
//!
//! Mutable response handed to handlers. Content type and content length are
//! kept apart from the header map and emitted when the response is serialized.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::{StatusCode, Version};

use super::version_str;
use crate::logger;

pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    content_type: String,
    content_length: Option<usize>,
    body: Vec<u8>,
}

impl Response {
    /// Fresh response: 200, `text/html`, protocol copied from the request
    pub fn new(version: Version) -> Self {
        Self {
            status: StatusCode::OK,
            version,
            headers: HeaderMap::new(),
            content_type: TEXT_HTML.to_string(),
            content_length: None,
            body: Vec::new(),
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub const fn version(&self) -> Version {
        self.version
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set a header from string parts, logging and skipping invalid input
    pub fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => logger::log_warning(&format!("Skipping invalid header {name}: {value:?}")),
        }
    }

    pub fn clear_headers(&mut self) {
        self.headers.clear();
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Explicit length if one was set, else the body length
    pub fn content_length(&self) -> usize {
        self.content_length.unwrap_or(self.body.len())
    }

    pub fn set_content_length(&mut self, len: usize) {
        self.content_length = Some(len);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the body; any explicit content length is dropped
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
        self.content_length = None;
    }

    /// Status code and reason, e.g. `404 Not Found`
    pub fn status_line(&self) -> String {
        status_text(self.status)
    }

    /// Full serialization: `STATUS-LINE\r\nHEADERS\r\n\r\nBODY`
    pub fn to_wire(&self) -> Vec<u8> {
        let mut head = format!(
            "{} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
            version_str(self.version),
            self.status_line(),
            self.content_type,
            self.content_length()
        );
        for (name, value) in &self.headers {
            if name == CONTENT_TYPE || name == CONTENT_LENGTH {
                continue;
            }
            head.push_str(name.as_str());
            head.push_str(": ");
            head.push_str(&String::from_utf8_lossy(value.as_bytes()));
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        let mut wire = head.into_bytes();
        wire.extend_from_slice(&self.body);
        wire
    }

    /// Convert into a hyper response for the connection writer
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let content_length = self.content_length();
        let mut headers = self.headers;
        match HeaderValue::from_str(&self.content_type) {
            Ok(value) => {
                headers.insert(CONTENT_TYPE, value);
            }
            Err(e) => logger::log_warning(&format!(
                "Invalid content type {:?}: {e}",
                self.content_type
            )),
        }
        headers.insert(CONTENT_LENGTH, HeaderValue::from(content_length));

        let mut resp = hyper::Response::new(Full::new(Bytes::from(self.body)));
        *resp.status_mut() = self.status;
        *resp.headers_mut() = headers;
        resp
    }

    /// Reset to a minimal `text/plain` response whose body is the status line.
    ///
    /// Redirects keep their `Location` header.
    pub(crate) fn reset_to_status_line(&mut self) {
        let location = if self.status.is_redirection() {
            self.headers.remove(LOCATION)
        } else {
            None
        };
        self.headers.clear();
        if let Some(location) = location {
            self.headers.insert(LOCATION, location);
        }
        self.content_type = TEXT_PLAIN.to_string();
        let line = self.status_line();
        self.set_body(line);
    }
}

/// Canonical human-readable status line for `status`
pub fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}
