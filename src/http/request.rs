//! Inbound request model
//!
//! A read-only snapshot of one HTTP request: method, URI, protocol and headers.
//! The body is not part of the routing model.

use hyper::header::HeaderMap;
use hyper::{Method, Uri, Version};

use super::{percent_decode, version_str};

#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
}

impl Request {
    pub const fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            version,
            headers,
        }
    }

    /// Snapshot the head of a hyper request
    pub fn from_hyper<B>(req: &hyper::Request<B>) -> Self {
        Self::new(
            req.method().clone(),
            req.uri().clone(),
            req.version(),
            req.headers().clone(),
        )
    }

    /// HTTP/1.1 GET request for `uri` with no headers
    ///
    /// Returns `None` when `uri` is not a valid request target.
    pub fn get(uri: &str) -> Option<Self> {
        let uri = uri.parse::<Uri>().ok()?;
        Some(Self::new(Method::GET, uri, Version::HTTP_11, HeaderMap::new()))
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Raw (still percent-encoded) path
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Percent-decoded path, the form routes are matched against
    pub fn decoded_path(&self) -> String {
        percent_decode(self.uri.path())
    }

    pub const fn version(&self) -> Version {
        self.version
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Request line and headers as they appear on the wire
    pub fn to_wire(&self) -> String {
        let target = self
            .uri
            .path_and_query()
            .map_or_else(|| self.uri.path(), |pq| pq.as_str());
        let mut out = format!(
            "{} {} {}\r\n",
            self.method,
            target,
            version_str(self.version)
        );
        for (name, value) in &self.headers {
            out.push_str(name.as_str());
            out.push_str(": ");
            out.push_str(&String::from_utf8_lossy(value.as_bytes()));
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HOST;

    #[test]
    fn test_decoded_path() {
        let req = Request::get("/files/my%20doc%2Etxt?x=1").unwrap();
        assert_eq!(req.path(), "/files/my%20doc%2Etxt");
        assert_eq!(req.decoded_path(), "/files/my doc.txt");
    }

    #[test]
    fn test_to_wire() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, "example.com".parse().unwrap());
        let req = Request::new(
            Method::POST,
            "/submit?a=b".parse().unwrap(),
            Version::HTTP_10,
            headers,
        );
        assert_eq!(
            req.to_wire(),
            "POST /submit?a=b HTTP/1.0\r\nhost: example.com\r\n\r\n"
        );
    }

    #[test]
    fn test_invalid_uri() {
        assert!(Request::get("not a uri").is_none());
    }
}
