//! Request dispatch module
//!
//! Runs one request through the dispatch table:
//!
//! 1. The percent-decoded path is tested against each route in order.
//! 2. On a match the handler runs behind a failure boundary; returning
//!    `false` lets later routes try the same path.
//! 3. With `append_slashes`, a route that matches only `path + "/"` answers
//!    with a 301 to that location without running its handler.
//! 4. Nothing handled means 404.
//! 5. Any final status other than 200 or 500 is rewritten to a plain-text
//!    status line.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::{self, AssertUnwindSafe};

use hyper::StatusCode;

use super::table::DispatchTable;
use crate::config::RouterOptions;
use crate::handler::{Captures, Context, Handler};
use crate::http::{Request, Response, TEXT_PLAIN};
use crate::logger;

/// Body of a 500 response when debug output is disabled
pub const INTERNAL_ERROR_BODY: &str = "500 - Internal Server Error";

/// A handler invocation that returned an error or panicked
#[derive(Debug)]
pub struct HandlerFailure {
    message: String,
    backtrace: String,
}

impl HandlerFailure {
    fn from_error(err: &anyhow::Error) -> Self {
        let backtrace = match err.backtrace().status() {
            BacktraceStatus::Captured => err.backtrace().to_string(),
            _ => Backtrace::force_capture().to_string(),
        };
        Self {
            message: format!("{err:#}"),
            backtrace,
        }
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "handler panicked".to_string());
        Self {
            message: format!("panic: {message}"),
            backtrace: Backtrace::force_capture().to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Dispatch `request` against `table` and return the finished response
pub fn dispatch(
    request: &Request,
    table: &DispatchTable,
    context: &mut Context,
    options: &RouterOptions,
) -> Response {
    let mut response = Response::new(request.version());
    let path = request.decoded_path();
    let mut handled = false;

    for route in table.routes() {
        if let Some(caps) = route.pattern().captures(&path) {
            let captures = Captures::from_regex(&caps);
            logger::log_debug(&format!(
                "{path} matched {}",
                route.pattern().as_str()
            ));
            handled = match invoke(route.handler(), &mut response, request, context, &captures) {
                Ok(handled) => handled,
                Err(failure) => {
                    fail(&mut response, request, context, options, &failure);
                    true
                }
            };
        } else if options.append_slashes {
            let with_slash = format!("{path}/");
            if route.pattern().is_match(&with_slash) {
                logger::log_redirect(&path, &with_slash);
                response.set_status(StatusCode::MOVED_PERMANENTLY);
                response.set_header("Location", &with_slash);
                handled = true;
            }
        }

        if handled {
            break;
        }
    }

    if !handled {
        logger::log_debug(&format!("No route for {path}"));
        response.set_status(StatusCode::NOT_FOUND);
    }

    finalize(&mut response);
    response
}

/// Run `handler`, turning errors and panics into a `HandlerFailure`
fn invoke(
    handler: &Handler,
    response: &mut Response,
    request: &Request,
    context: &mut Context,
    captures: &Captures,
) -> Result<bool, HandlerFailure> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        handler.invoke(response, request, context, captures)
    }));
    match outcome {
        Ok(Ok(handled)) => Ok(handled),
        Ok(Err(err)) => Err(HandlerFailure::from_error(&err)),
        Err(payload) => Err(HandlerFailure::from_panic(&*payload)),
    }
}

/// Replace whatever the handler produced with a 500
fn fail(
    response: &mut Response,
    request: &Request,
    context: &Context,
    options: &RouterOptions,
    failure: &HandlerFailure,
) {
    logger::log_handler_failure(request.method(), request.path(), failure.message());

    let body = if options.debug {
        debug_body(response, request, context, failure)
    } else {
        INTERNAL_ERROR_BODY.to_string()
    };

    response.clear_headers();
    response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.set_content_type(TEXT_PLAIN);
    response.set_body(body);
}

fn debug_body(
    response: &Response,
    request: &Request,
    context: &Context,
    failure: &HandlerFailure,
) -> String {
    let context_dump = serde_json::to_string_pretty(context)
        .unwrap_or_else(|e| format!("<unserializable context: {e}>"));
    format!(
        "{INTERNAL_ERROR_BODY}\n\n\
         Error: {}\n\n\
         Backtrace:\n{}\n\n\
         Request:\n{}\n\
         Response:\n{}\n\n\
         Context:\n{context_dump}\n",
        failure.message,
        failure.backtrace,
        request.to_wire(),
        String::from_utf8_lossy(&response.to_wire()),
    )
}

/// Anything but 200 and 500 becomes a minimal plain-text status response
fn finalize(response: &mut Response) {
    let status = response.status();
    if status != StatusCode::OK && status != StatusCode::INTERNAL_SERVER_ERROR {
        response.reset_to_status_line();
    }
}
