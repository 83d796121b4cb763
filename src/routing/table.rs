//! Dispatch table module
//!
//! Ordered pattern/handler pairs. Order is significant: the first matching
//! route wins, and the table is never reordered.

use hyper::StatusCode;
use regex::Regex;

use crate::config::RouteSpec;
use crate::error::RouterError;
use crate::handler::{self, Handler};

/// One dispatch entry
#[derive(Debug, Clone)]
pub struct Route {
    pattern: Regex,
    handler: Handler,
}

impl Route {
    pub const fn new(pattern: Regex, handler: Handler) -> Self {
        Self { pattern, handler }
    }

    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub const fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// Element of the flat `pattern, handler, pattern, handler, ...` form
#[derive(Debug, Clone)]
pub enum TableSlot {
    Pattern(Regex),
    Handler(Handler),
}

#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    routes: Vec<Route>,
}

impl DispatchTable {
    pub const fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn builder() -> DispatchTableBuilder {
        DispatchTableBuilder::default()
    }

    /// Whether `slots` has even length and alternates pattern, handler
    pub fn is_valid(slots: &[TableSlot]) -> bool {
        slots.len() % 2 == 0
            && slots.chunks_exact(2).all(|pair| {
                matches!(
                    pair,
                    [TableSlot::Pattern(_), TableSlot::Handler(_)]
                )
            })
    }

    /// Build a table from its flat form, rejecting malformed input as a whole
    pub fn from_flat(slots: Vec<TableSlot>) -> Result<Self, RouterError> {
        if slots.len() % 2 != 0 {
            return Err(RouterError::Configuration(format!(
                "dispatch table has odd length {}",
                slots.len()
            )));
        }
        if !Self::is_valid(&slots) {
            return Err(RouterError::Configuration(
                "dispatch table entries must be (pattern, handler) pairs".to_string(),
            ));
        }

        let mut routes = Vec::with_capacity(slots.len() / 2);
        let mut slots = slots.into_iter();
        while let (Some(TableSlot::Pattern(pattern)), Some(TableSlot::Handler(handler))) =
            (slots.next(), slots.next())
        {
            routes.push(Route::new(pattern, handler));
        }
        Ok(Self::new(routes))
    }

    /// Build a table from configured route specs, in declaration order
    pub fn from_specs(specs: &[RouteSpec]) -> Result<Self, RouterError> {
        let mut builder = Self::builder();
        for spec in specs {
            let handler = match spec {
                RouteSpec::Static { root, .. } => handler::static_handler(root)?,
                RouteSpec::Text {
                    body, content_type, ..
                } => handler::text_handler(body.as_str(), content_type.as_str()),
                RouteSpec::Redirect { target, code, .. } => {
                    let status = StatusCode::from_u16(*code).map_err(|e| {
                        RouterError::Configuration(format!("invalid redirect code {code}: {e}"))
                    })?;
                    handler::redirect_handler(target.as_str(), status)
                }
            };
            builder = builder.route(spec.pattern(), handler);
        }
        builder.build()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects string patterns and compiles them all on `build`
#[derive(Debug, Default)]
pub struct DispatchTableBuilder {
    entries: Vec<(String, Handler)>,
}

impl DispatchTableBuilder {
    #[must_use]
    pub fn route(mut self, pattern: impl Into<String>, handler: Handler) -> Self {
        self.entries.push((pattern.into(), handler));
        self
    }

    pub fn build(self) -> Result<DispatchTable, RouterError> {
        let routes = self
            .entries
            .into_iter()
            .map(|(pattern, handler)| {
                Regex::new(&pattern)
                    .map(|re| Route::new(re, handler))
                    .map_err(|source| RouterError::InvalidPattern { pattern, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DispatchTable::new(routes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        Handler::new(|_, _, _, _| Ok(true))
    }

    fn pattern(re: &str) -> TableSlot {
        TableSlot::Pattern(Regex::new(re).unwrap())
    }

    #[test]
    fn test_from_flat_valid() {
        let table = DispatchTable::from_flat(vec![
            pattern("^/a$"),
            TableSlot::Handler(noop()),
            pattern("^/b$"),
            TableSlot::Handler(noop()),
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.routes()[0].pattern().as_str(), "^/a$");
        assert_eq!(table.routes()[1].pattern().as_str(), "^/b$");
    }

    #[test]
    fn test_from_flat_empty() {
        let table = DispatchTable::from_flat(Vec::new()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_from_flat_odd_length() {
        let slots = vec![pattern("^/a$"), TableSlot::Handler(noop()), pattern("^/b$")];
        assert!(!DispatchTable::is_valid(&slots));
        assert!(matches!(
            DispatchTable::from_flat(slots),
            Err(RouterError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_flat_wrong_kinds() {
        let swapped = vec![TableSlot::Handler(noop()), pattern("^/a$")];
        assert!(matches!(
            DispatchTable::from_flat(swapped),
            Err(RouterError::Configuration(_))
        ));

        let two_patterns = vec![pattern("^/a$"), pattern("^/b$")];
        assert!(!DispatchTable::is_valid(&two_patterns));
        assert!(DispatchTable::from_flat(two_patterns).is_err());
    }

    #[test]
    fn test_builder_keeps_order() {
        let table = DispatchTable::builder()
            .route("^/z$", noop())
            .route("^/a$", noop())
            .route("^/z$", noop())
            .build()
            .unwrap();
        let patterns: Vec<_> = table.routes().iter().map(|r| r.pattern().as_str()).collect();
        assert_eq!(patterns, ["^/z$", "^/a$", "^/z$"]);
    }

    #[test]
    fn test_builder_invalid_pattern() {
        let err = DispatchTable::builder()
            .route("^/ok$", noop())
            .route("^/(unclosed$", noop())
            .build()
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { ref pattern, .. } if pattern == "^/(unclosed$"));
    }

    #[test]
    fn test_from_specs() {
        let specs = vec![
            RouteSpec::Text {
                pattern: "^/$".to_string(),
                body: "home".to_string(),
                content_type: "text/plain".to_string(),
            },
            RouteSpec::Redirect {
                pattern: "^/old$".to_string(),
                target: "/".to_string(),
                code: 301,
            },
            RouteSpec::Static {
                pattern: "^/static/(.*)$".to_string(),
                root: "public".into(),
            },
        ];
        let table = DispatchTable::from_specs(&specs).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.routes()[2].pattern().as_str(), "^/static/(.*)$");
    }

    #[test]
    fn test_from_specs_bad_redirect_code() {
        let specs = vec![RouteSpec::Redirect {
            pattern: "^/old$".to_string(),
            target: "/".to_string(),
            code: 42,
        }];
        assert!(matches!(
            DispatchTable::from_specs(&specs),
            Err(RouterError::Configuration(_))
        ));
    }
}
