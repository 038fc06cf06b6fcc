//! Conversion of handler return values into HTTP responses.
//!
//! Everything a handler (or an extraction error) can produce goes through
//! [`Responder`] on its way out, so plain strings, status codes and results
//! can all be returned directly.

use crate::body::ResponseBody;
use crate::RequestContext;
use http::{Response, StatusCode};
use std::convert::Infallible;

pub trait Responder {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody>;
}

impl<T: Responder, E: Responder> Responder for Result<T, E> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Ok(t) => t.response_to(req),
            Err(e) => e.response_to(req),
        }
    }
}

/// None responds with an empty body.
impl<T: Responder> Responder for Option<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Some(t) => t.response_to(req),
            None => Response::new(ResponseBody::empty()),
        }
    }
}

impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

impl Responder for StatusCode {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        (self, ()).response_to(req)
    }
}

impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to(req);
        *response.status_mut() = status;
        response
    }
}

impl<T: Responder> Responder for Box<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        (*self).response_to(req)
    }
}

impl Responder for () {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for &'static str {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        plain_text(ResponseBody::from(self))
    }
}

impl Responder for String {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        plain_text(ResponseBody::from(self))
    }
}

impl Responder for Infallible {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        unreachable!()
    }
}

fn plain_text(body: ResponseBody) -> Response<ResponseBody> {
    let mut builder = Response::builder().status(StatusCode::OK);
    if let Some(headers) = builder.headers_mut() {
        headers.reserve(8);
        if let Ok(content_type) = mime::TEXT_PLAIN_UTF_8.as_ref().parse() {
            headers.insert(http::header::CONTENT_TYPE, content_type);
        }
    }
    builder.body(body).unwrap_or_else(|_| Response::new(ResponseBody::empty()))
}

#[cfg(test)]
mod tests {
    use super::Responder;
    use crate::{RequestContext, RouteParams};
    use http::{Request, StatusCode};
    use trellis_http::protocol::RequestHeader;

    fn with_context<F: FnOnce(&RequestContext)>(f: F) {
        let (parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let header = RequestHeader::from(parts);
        let params = RouteParams::empty();
        let ctx = RequestContext::new(&header, &params);
        f(&ctx);
    }

    #[test]
    fn str_is_plain_text_ok() {
        with_context(|ctx| {
            let response = "hello".response_to(ctx);
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers().get(http::header::CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
        });
    }

    #[test]
    fn status_tuple_overrides_status() {
        with_context(|ctx| {
            let response = (StatusCode::BAD_REQUEST, String::from("nope")).response_to(ctx);
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(response.into_body().into_bytes().as_ref(), b"nope");
        });
    }

    #[test]
    fn option_none_is_empty_ok() {
        with_context(|ctx| {
            let response = Option::<&'static str>::None.response_to(ctx);
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.into_body().is_empty());
        });
    }
}
