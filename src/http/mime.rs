//! MIME type detection module
//!
//! Resolves a file name to its content type based on the extension.

use std::path::Path;

/// Content type used when a file's type cannot be determined.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A resolved MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeType {
    name: &'static str,
    binary: bool,
}

impl MimeType {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            binary: false,
        }
    }

    const fn binary(name: &'static str) -> Self {
        Self { name, binary: true }
    }

    /// Full content type, e.g. `image/png`
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn is_binary(&self) -> bool {
        self.binary
    }
}

/// Look up the MIME type of `path` from its extension (case-insensitive).
///
/// # Examples
/// ```
/// use std::path::Path;
/// use rxroute::http::mime::type_of;
/// assert_eq!(type_of(Path::new("logo.PNG")).map(|m| m.name()), Some("image/png"));
/// assert!(type_of(Path::new("README")).is_none());
/// ```
pub fn type_of(path: &Path) -> Option<MimeType> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        // Text
        "html" | "htm" => MimeType::text("text/html; charset=utf-8"),
        "css" => MimeType::text("text/css"),
        "txt" | "md" => MimeType::text("text/plain; charset=utf-8"),
        "csv" => MimeType::text("text/csv"),
        "xml" => MimeType::text("application/xml"),

        // JavaScript/WASM
        "js" | "mjs" => MimeType::text("application/javascript"),
        "json" => MimeType::text("application/json"),
        "wasm" => MimeType::binary("application/wasm"),

        // Images
        "png" => MimeType::binary("image/png"),
        "jpg" | "jpeg" => MimeType::binary("image/jpeg"),
        "gif" => MimeType::binary("image/gif"),
        "svg" => MimeType::text("image/svg+xml"),
        "ico" => MimeType::binary("image/x-icon"),
        "webp" => MimeType::binary("image/webp"),

        // Video
        "mp4" => MimeType::binary("video/mp4"),
        "webm" => MimeType::binary("video/webm"),
        "ogg" | "ogv" => MimeType::binary("video/ogg"),

        // Audio
        "mp3" => MimeType::binary("audio/mpeg"),
        "wav" => MimeType::binary("audio/wav"),

        // Fonts
        "woff" => MimeType::binary("font/woff"),
        "woff2" => MimeType::binary("font/woff2"),
        "ttf" => MimeType::binary("font/ttf"),

        // Documents
        "pdf" => MimeType::binary("application/pdf"),
        "zip" => MimeType::binary("application/zip"),
        "gz" | "gzip" => MimeType::binary("application/gzip"),
        "tar" => MimeType::binary("application/x-tar"),

        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        let name = |p: &str| type_of(Path::new(p)).map(|m| m.name());
        assert_eq!(name("index.html"), Some("text/html; charset=utf-8"));
        assert_eq!(name("site.css"), Some("text/css"));
        assert_eq!(name("app.js"), Some("application/javascript"));
        assert_eq!(name("dir/photo.JPG"), Some("image/jpeg"));
        assert_eq!(name("clip.mp4"), Some("video/mp4"));
    }

    #[test]
    fn test_binary_flag() {
        assert!(type_of(Path::new("a.png")).is_some_and(|m| m.is_binary()));
        assert!(type_of(Path::new("a.txt")).is_some_and(|m| !m.is_binary()));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(type_of(Path::new("file.xyz")).is_none());
        assert!(type_of(Path::new("Makefile")).is_none());
    }
}
