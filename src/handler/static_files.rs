//! Static file serving module
//!
//! Builds handlers that serve files below a fixed root directory. The file is
//! named by the first capture group of the route pattern.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Component, Path, PathBuf};

use hyper::StatusCode;

use super::{Handler, HandlerResult};
use crate::error::{RouterError, StaticError};
use crate::http::mime::{self, DEFAULT_CONTENT_TYPE};
use crate::http::{percent_decode, Response, TEXT_PLAIN};
use crate::logger;

/// Filesystem root with its containment check
#[derive(Debug, Clone)]
pub struct StaticRoot {
    root: PathBuf,
    canonical_root: PathBuf,
    default_content_type: &'static str,
}

impl StaticRoot {
    /// Resolve `root` to an absolute path.
    ///
    /// The root does not have to exist yet; requests below a missing root are 404.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, RouterError> {
        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|source| RouterError::StaticRoot {
                    path: root.to_path_buf(),
                    source,
                })?
                .join(root)
        };
        let root = normalize(&absolute);
        let canonical_root = root.canonicalize().unwrap_or_else(|_| root.clone());
        Ok(Self {
            root,
            canonical_root,
            default_content_type: DEFAULT_CONTENT_TYPE,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Map a captured path fragment to an absolute path inside the root
    pub fn resolve(&self, fragment: &str) -> Result<PathBuf, StaticError> {
        let candidate = normalize(&self.root.join(percent_decode(fragment)));
        if !candidate.starts_with(&self.root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {fragment} -> {}",
                candidate.display()
            ));
            return Err(StaticError::NotFound(candidate));
        }
        Ok(candidate)
    }

    /// Fill `resp` with the contents of the file named by `fragment`
    pub fn serve(&self, resp: &mut Response, fragment: &str) -> Result<(), StaticError> {
        let path = self.resolve(fragment)?;

        let mut file = File::open(&path).map_err(|e| open_error(path.clone(), e))?;

        let metadata = file.metadata().map_err(|source| StaticError::Io {
            path: path.clone(),
            source,
        })?;
        if metadata.is_dir() {
            return Err(StaticError::NotFound(path));
        }

        // Symlinks may point outside the root even when the lexical path does not
        if let Ok(real) = path.canonicalize() {
            if !real.starts_with(&self.canonical_root) {
                logger::log_warning(&format!(
                    "Symlink escape blocked: {} -> {}",
                    path.display(),
                    real.display()
                ));
                return Err(StaticError::NotFound(path));
            }
        }

        let content_type =
            mime::type_of(&path).map_or(self.default_content_type, |m| m.name());

        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|source| StaticError::Io {
                path: path.clone(),
                source,
            })?;

        let len = content.len();
        resp.set_body(content);
        resp.set_content_length(len);
        if len == 0 {
            resp.set_content_type(TEXT_PLAIN);
        } else {
            resp.set_content_type(content_type);
        }
        Ok(())
    }
}

/// Build a handler serving files below `root`.
///
/// Missing files and paths escaping the root answer 404, unreadable files 403.
/// Other I/O errors are returned as handler failures.
pub fn static_handler(root: impl AsRef<Path>) -> Result<Handler, RouterError> {
    let root = StaticRoot::new(root)?;
    Ok(Handler::new(move |resp, _req, _ctx, caps| {
        let fragment = caps.get(0).unwrap_or_default();
        let outcome = root.serve(resp, fragment);
        apply_outcome(resp, outcome)
    }))
}

/// Classify a failed open: paths that cannot name an existing file are 404
fn open_error(path: PathBuf, e: io::Error) -> StaticError {
    match e.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::InvalidFilename => {
            StaticError::NotFound(path)
        }
        ErrorKind::PermissionDenied => StaticError::Forbidden(path),
        _ => StaticError::Io { path, source: e },
    }
}

/// Turn a serve outcome into the handler result: 404/403 are handled
/// responses, anything else is a handler failure
fn apply_outcome(resp: &mut Response, outcome: Result<(), StaticError>) -> HandlerResult {
    match outcome {
        Ok(()) => {}
        Err(StaticError::NotFound(path)) => {
            logger::log_debug(&format!("Static file not found: {}", path.display()));
            resp.set_status(StatusCode::NOT_FOUND);
        }
        Err(StaticError::Forbidden(path)) => {
            logger::log_warning(&format!("Static file not readable: {}", path.display()));
            resp.set_status(StatusCode::FORBIDDEN);
        }
        Err(e @ StaticError::Io { .. }) => return Err(e.into()),
    }
    Ok(true)
}

/// Lexically resolve `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
        }
    }
    out
}
