//! HTTP request header handling.
//!
//! Wraps the standard `http::Request` type so the layers above can pass
//! around the decoded head of a request independently of its body.

use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri, Version};

/// The head of an HTTP request: method, uri, version and headers.
///
/// Produced by the request decoder once the header section is complete;
/// the (already buffered) body travels separately.
#[derive(Debug)]
pub struct RequestHeader {
    inner: Request<()>,
}

impl From<Parts> for RequestHeader {
    fn from(parts: Parts) -> Self {
        Self { inner: Request::from_parts(parts, ()) }
    }
}

impl AsRef<Request<()>> for RequestHeader {
    fn as_ref(&self) -> &Request<()> {
        &self.inner
    }
}

impl RequestHeader {
    /// Consumes the header and returns the inner `Request<()>`.
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }

    /// Attaches a body, turning the header back into a full `Request<T>`.
    pub fn body<T>(self, body: T) -> Request<T> {
        self.inner.map(|_| body)
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// The declared `Content-Length`, or 0 when the header is absent.
    ///
    /// Returns `None` only when the header is present but unparsable.
    pub fn content_length(&self) -> Option<u64> {
        match self.headers().get(http::header::CONTENT_LENGTH) {
            None => Some(0),
            Some(value) => value.to_str().ok()?.trim().parse::<u64>().ok(),
        }
    }
}
