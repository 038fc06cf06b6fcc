//! Access to the decoded request head and the captures of the matched route.
//!
//! [`RequestContext`] is what guards, extractors and handlers see: the
//! request header plus the [`RouteParams`] captured by the pattern router.

use http::{HeaderMap, Method, Uri, Version};
use matchit::Params;
use trellis_http::protocol::RequestHeader;

/// The per-request view handed through the dispatch pipeline.
///
/// The lifetimes tie the context to the server-owned router ('server) and to
/// the request data ('req); it never outlives either.
pub struct RequestContext<'server: 'req, 'req> {
    request_header: &'req RequestHeader,
    route_params: &'req RouteParams<'server, 'req>,
}

impl<'server, 'req> RequestContext<'server, 'req> {
    pub fn new(request_header: &'req RequestHeader, route_params: &'req RouteParams<'server, 'req>) -> Self {
        Self { request_header, route_params }
    }

    pub fn request_header(&self) -> &RequestHeader {
        self.request_header
    }

    pub fn method(&self) -> &Method {
        self.request_header.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request_header.uri()
    }

    pub fn path(&self) -> &str {
        self.request_header.uri().path()
    }

    pub fn version(&self) -> Version {
        self.request_header.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request_header.headers()
    }

    /// The declared content length, `None` when the header is unparsable.
    pub fn content_length(&self) -> Option<u64> {
        self.request_header.content_length()
    }

    /// The named captures of the matched route pattern.
    pub fn route_params(&self) -> &RouteParams<'server, 'req> {
        self.route_params
    }
}

/// Named captures extracted from the request path by the pattern router.
///
/// For the pattern `/users/{id}` and the path `/users/7`, `get("id")`
/// returns `"7"`. Guards run before routing and therefore see an empty set.
#[derive(Debug, Clone)]
pub struct RouteParams<'server, 'req> {
    kind: RouteParamsKind<'server, 'req>,
}

#[derive(Debug, Clone)]
enum RouteParamsKind<'server, 'req> {
    None,
    Params(Params<'server, 'req>),
}

impl<'server, 'req> RouteParams<'server, 'req> {
    #[inline]
    fn new(params: Params<'server, 'req>) -> Self {
        if params.is_empty() {
            Self::empty()
        } else {
            Self { kind: RouteParamsKind::Params(params) }
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self { kind: RouteParamsKind::None }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            RouteParamsKind::None => true,
            RouteParamsKind::Params(params) => params.is_empty(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match &self.kind {
            RouteParamsKind::None => 0,
            RouteParamsKind::Params(params) => params.len(),
        }
    }

    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'req str> {
        match &self.kind {
            RouteParamsKind::Params(params) => params.get(key),
            RouteParamsKind::None => None,
        }
    }
}

impl<'server, 'req> From<Params<'server, 'req>> for RouteParams<'server, 'req> {
    fn from(params: Params<'server, 'req>) -> Self {
        RouteParams::new(params)
    }
}
