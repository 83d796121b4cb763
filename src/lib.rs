//! # rxroute
//!
//! A small regex request router on top of a hyper HTTP/1 server.
//!
//! Requests are matched against an ordered list of pattern/handler pairs; the
//! first handler that accepts the request fills in the response. Paths that
//! only match with a trailing slash are redirected, handler errors and panics
//! become 500 responses, and every response other than 200/500 is reduced to a
//! plain-text status line.
//!
//! ```no_run
//! use rxroute::config::RouterOptions;
//! use rxroute::handler::{static_handler, Handler};
//! use rxroute::http::Request;
//! use rxroute::routing::{DispatchTable, Router};
//!
//! # fn main() -> Result<(), rxroute::error::RouterError> {
//! let table = DispatchTable::builder()
//!     .route("^/hello/$", Handler::new(|resp, _req, _ctx, _caps| {
//!         resp.set_content_type("text/plain");
//!         resp.set_body("Hello, world!");
//!         Ok(true)
//!     }))
//!     .route("^/static/(.*)$", static_handler("public")?)
//!     .build()?;
//! let router = Router::new(table, RouterOptions::default());
//! let response = router.dispatch(&Request::get("/hello").unwrap());
//! assert_eq!(response.status().as_u16(), 301);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::{RouterError, StaticError};
pub use handler::{Captures, Context, Handler};
pub use routing::{DispatchTable, Router};
