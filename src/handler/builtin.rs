//! Fixed-response handlers used by configured routes

use hyper::StatusCode;

use super::Handler;

/// Always answers with `body` and `content_type`
pub fn text_handler(body: impl Into<String>, content_type: impl Into<String>) -> Handler {
    let body = body.into();
    let content_type = content_type.into();
    Handler::new(move |resp, _req, _ctx, _caps| {
        resp.set_content_type(content_type.as_str());
        resp.set_body(body.as_str());
        Ok(true)
    })
}

/// Redirects to `target` with `status`.
///
/// `$1`..`$9` in `target` are replaced by the corresponding capture group.
pub fn redirect_handler(target: impl Into<String>, status: StatusCode) -> Handler {
    let target = target.into();
    Handler::new(move |resp, _req, _ctx, caps| {
        let mut location = target.clone();
        for i in (1..=9).rev() {
            let placeholder = format!("${i}");
            if location.contains(&placeholder) {
                location = location.replace(&placeholder, caps.get(i - 1).unwrap_or_default());
            }
        }
        resp.set_status(status);
        resp.set_header("Location", &location);
        Ok(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Captures, Context};
    use crate::http::{Request, Response};

    fn run(handler: &Handler, caps: &Captures) -> Response {
        let req = Request::get("/x").unwrap();
        let mut resp = Response::new(req.version());
        let mut ctx = Context::new();
        assert!(handler.invoke(&mut resp, &req, &mut ctx, caps).unwrap());
        resp
    }

    #[test]
    fn test_text_handler() {
        let resp = run(&text_handler("Hello", "text/plain"), &Captures::default());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.content_type(), "text/plain");
        assert_eq!(resp.body(), b"Hello");
    }

    #[test]
    fn test_redirect_substitutes_captures() {
        let caps: Captures = ["docs", "intro"].into_iter().collect();
        let resp = run(
            &redirect_handler("/new/$1/$2.html", StatusCode::FOUND),
            &caps,
        );
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.header("location"), Some("/new/docs/intro.html"));
    }
}
