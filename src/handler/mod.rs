//! Request handler module
//!
//! A handler is an opaque function value invoked with the response to fill in,
//! the request, the shared context and the regex captures of the route that
//! matched. It returns whether it handled the request; `false` lets the
//! dispatcher try later routes.

pub mod builtin;
pub mod static_files;

pub use builtin::{redirect_handler, text_handler};
pub use static_files::static_handler;

use std::fmt;
use std::sync::Arc;

use crate::http::{Request, Response};

/// Long-lived mutable stash shared by every handler invocation
pub type Context = serde_json::Map<String, serde_json::Value>;

/// Result of a handler invocation: `Ok(handled)` or a failure that becomes a 500
pub type HandlerResult = anyhow::Result<bool>;

type HandlerFn = dyn Fn(&mut Response, &Request, &mut Context, &Captures) -> HandlerResult
    + Send
    + Sync;

#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Response, &Request, &mut Context, &Captures) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn invoke(
        &self,
        response: &mut Response,
        request: &Request,
        context: &mut Context,
        captures: &Captures,
    ) -> HandlerResult {
        (self.0)(response, request, context, captures)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Capture groups of the pattern that matched, in group order.
///
/// Index 0 is the first group, not the whole match. Groups that did not
/// participate in the match are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(Vec<Option<String>>);

impl Captures {
    pub fn from_regex(caps: &regex::Captures<'_>) -> Self {
        Self(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(Option::as_deref)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Captures {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| Some(s.into())).collect())
    }
}
