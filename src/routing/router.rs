//! Router instance
//!
//! Owns the dispatch table, the shared context and the dispatch options for
//! one server. Requests are dispatched one at a time: the context lock is held
//! for the whole dispatch.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::dispatcher;
use super::table::DispatchTable;
use crate::config::{Config, RouterOptions};
use crate::error::RouterError;
use crate::handler::Context;
use crate::http::{Request, Response};

#[derive(Debug)]
pub struct Router {
    table: RwLock<Arc<DispatchTable>>,
    context: Mutex<Context>,
    options: RouterOptions,
}

impl Router {
    pub fn new(table: DispatchTable, options: RouterOptions) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
            context: Mutex::new(Context::new()),
            options,
        }
    }

    /// Build the table, options and initial context from configuration
    pub fn from_config(config: &Config) -> Result<Self, RouterError> {
        let table = DispatchTable::from_specs(&config.routes)?;
        Ok(Self::new(table, config.router.clone()).with_context(config.context.clone()))
    }

    #[must_use]
    pub fn with_context(self, context: Context) -> Self {
        Self {
            context: Mutex::new(context),
            ..self
        }
    }

    pub const fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn table(&self) -> Arc<DispatchTable> {
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in a new table; dispatches already running keep the old one
    pub fn replace_table(&self, table: DispatchTable) {
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
    }

    /// Exclusive access to the shared context
    pub fn context(&self) -> MutexGuard<'_, Context> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dispatch(&self, request: &Request) -> Response {
        let table = self.table();
        let mut context = self.context();
        dispatcher::dispatch(request, &table, &mut context, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{text_handler, Handler};
    use hyper::StatusCode;

    #[test]
    fn test_dispatch_and_context() {
        let table = DispatchTable::builder()
            .route(
                "^/visit$",
                Handler::new(|resp, _req, ctx, _caps| {
                    let visits = ctx
                        .entry("visits")
                        .or_insert_with(|| serde_json::Value::from(0));
                    *visits = serde_json::Value::from(visits.as_u64().unwrap_or(0) + 1);
                    resp.set_body(visits.to_string());
                    Ok(true)
                }),
            )
            .build()
            .unwrap();
        let mut seed = Context::new();
        seed.insert("visits".into(), 10.into());
        let router = Router::new(table, RouterOptions::default()).with_context(seed);

        let req = Request::get("/visit").unwrap();
        router.dispatch(&req);
        let resp = router.dispatch(&req);
        assert_eq!(resp.body(), b"12");
        assert_eq!(router.context()["visits"], 12);
    }

    #[test]
    fn test_replace_table() {
        let router = Router::new(DispatchTable::default(), RouterOptions::default());
        let req = Request::get("/").unwrap();
        assert_eq!(router.dispatch(&req).status(), StatusCode::NOT_FOUND);

        router.replace_table(
            DispatchTable::builder()
                .route("^/$", text_handler("home", "text/plain"))
                .build()
                .unwrap(),
        );
        let resp = router.dispatch(&req);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), b"home");
    }
}
