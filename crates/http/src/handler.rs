//! The seam between the transport and whatever sits above it.
//!
//! A [`Handler`] receives one fully buffered request and produces one
//! response. The web layer implements this for its dispatcher; plain async
//! functions can be adapted with [`make_handler`].

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use std::error::Error;

/// Error type escalated from handlers to the connection loop.
///
/// The connection answers it with a plain 500; anything user-visible should
/// be turned into a `Response` before reaching this seam.
pub type HandlerError = Box<dyn Error + Send + Sync>;

#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError>;
}

/// Adapts a plain async function into a [`Handler`].
pub fn make_handler<F, Fut>(f: F) -> impl Handler
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Bytes>, HandlerError>> + Send,
{
    FnHandler { f }
}

struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Bytes>, HandlerError>> + Send,
{
    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        (self.f)(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::{make_handler, Handler, HandlerError};
    use bytes::Bytes;
    use http::{Request, Response};

    async fn echo(req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        Ok(Response::new(req.into_body()))
    }

    #[tokio::test]
    async fn fn_is_handler() {
        let handler = make_handler(echo);
        let request = Request::new(Bytes::from_static(b"ping"));
        let response = handler.call(request).await.unwrap();
        assert_eq!(response.body().as_ref(), b"ping");
    }
}
