//! HTTP model module
//!
//! Request/response representation used by the router, MIME lookup and
//! percent decoding. Wire I/O itself lives in the server module.

pub mod mime;
pub mod request;
pub mod response;

pub use request::Request;
pub use response::{status_text, Response, TEXT_HTML, TEXT_PLAIN};

use hyper::Version;

/// Percent-decode `input`; invalid UTF-8 is replaced rather than rejected
pub fn percent_decode(input: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(input.as_bytes())).into_owned()
}

pub(crate) const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b/%2e%2e/c"), "/a b/../c");
        assert_eq!(percent_decode("/plain"), "/plain");
        assert_eq!(percent_decode("/bad%ff"), "/bad\u{fffd}");
    }
}
