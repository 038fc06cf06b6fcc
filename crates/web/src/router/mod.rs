//! Method-bucket routing.
//!
//! The router keeps one pattern router per enumerated HTTP method plus a
//! catch-all bucket for any other token, mirroring how a request is
//! dispatched: pick the bucket by method, then pattern-match the path
//! within it. Pattern syntax and match precedence are delegated to
//! [`matchit`].
//!
//! Routes are registered on a [`RouterBuilder`] before the server starts;
//! `build()` hands back an immutable snapshot, so a running server's routes
//! cannot change underneath it.

use crate::handler::RequestHandler;
use crate::RouteParams;
use http::Method;
use std::collections::HashMap;

type PatternRouter = matchit::Router<Box<dyn RequestHandler>>;

/// The nine methods with a dedicated bucket; everything else shares the
/// trailing custom bucket.
const METHOD_BUCKETS: [&str; 9] = ["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "CONNECT", "OPTIONS", "TRACE"];
const CUSTOM_BUCKET: usize = METHOD_BUCKETS.len();
const BUCKET_COUNT: usize = METHOD_BUCKETS.len() + 1;

/// Method tokens compare case-insensitively; unknown tokens are never an
/// error, they select the custom bucket.
fn bucket_index(method: &Method) -> usize {
    let token = method.as_str();
    METHOD_BUCKETS.iter().position(|name| token.eq_ignore_ascii_case(name)).unwrap_or(CUSTOM_BUCKET)
}

/// An immutable routing table, safe to share across in-flight requests.
pub struct Router {
    buckets: [PatternRouter; BUCKET_COUNT],
}

/// A matched route: the handler plus the pattern's path captures.
pub struct RouteMatch<'router, 'req> {
    handler: &'router dyn RequestHandler,
    params: RouteParams<'router, 'req>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Selects the bucket for `method` and pattern-matches `path` in it.
    ///
    /// `None` means not found: either the bucket has no matching pattern or
    /// the method's bucket is empty altogether.
    pub fn at<'router, 'req>(&'router self, method: &Method, path: &'req str) -> Option<RouteMatch<'router, 'req>> {
        match self.buckets[bucket_index(method)].at(path) {
            Ok(matched) => Some(RouteMatch { handler: matched.value.as_ref(), params: matched.params.into() }),
            Err(_) => None,
        }
    }
}

impl<'router, 'req> RouteMatch<'router, 'req> {
    pub fn handler(&self) -> &'router dyn RequestHandler {
        self.handler
    }

    pub fn params(&self) -> RouteParams<'router, 'req> {
        self.params.clone()
    }
}

/// Collects routes before the server starts.
pub struct RouterBuilder {
    data: [HashMap<String, Box<dyn RequestHandler>>; BUCKET_COUNT],
}

macro_rules! method_route {
    ($method:ident, $constant:ident) => {
        #[doc = concat!("Registers a ", stringify!($constant), " route.")]
        pub fn $method(self, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
            self.route(Method::$constant, pattern, handler)
        }
    };
}

impl RouterBuilder {
    fn new() -> Self {
        Self { data: std::array::from_fn(|_| HashMap::new()) }
    }

    /// Registers a route in the bucket for `method`.
    ///
    /// Registering the same (method, pattern) pair again replaces the
    /// earlier handler.
    pub fn route(mut self, method: Method, pattern: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.data[bucket_index(&method)].insert(pattern.into(), Box::new(handler));
        self
    }

    method_route!(get, GET);
    method_route!(head, HEAD);
    method_route!(post, POST);
    method_route!(put, PUT);
    method_route!(patch, PATCH);
    method_route!(delete, DELETE);
    method_route!(connect, CONNECT);
    method_route!(options, OPTIONS);
    method_route!(trace, TRACE);

    /// Builds the immutable routing table.
    ///
    /// # Panics
    ///
    /// Panics on invalid pattern syntax; a bad pattern is a setup bug and
    /// must keep the server from starting.
    pub fn build(self) -> Router {
        let mut buckets: [PatternRouter; BUCKET_COUNT] = std::array::from_fn(|_| matchit::Router::new());

        for (index, routes) in self.data.into_iter().enumerate() {
            for (pattern, handler) in routes {
                if let Err(e) = buckets[index].insert(pattern.clone(), handler) {
                    panic!("invalid route pattern {pattern}: {e}");
                }
            }
        }

        Router { buckets }
    }
}
