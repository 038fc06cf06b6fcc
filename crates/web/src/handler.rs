//! The terminal handler seam of the router.
//!
//! A [`RequestHandler`] is what routes store and the dispatcher invokes.
//! Plain async functions become handlers through [`handler_fn`]: their
//! arguments are produced by [`FromRequest`] extraction and their return
//! value goes through [`Responder`]. Extraction failures never escape the
//! handler; they are converted into the error's own response.

use crate::body::ResponseBody;
use crate::fn_trait::FnTrait;
use crate::responder::Responder;
use crate::{BodyBytes, FromRequest, RequestContext};
use async_trait::async_trait;
use http::Response;
use std::marker::PhantomData;

#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke<'server, 'req>(
        &self,
        req: RequestContext<'server, 'req>,
        req_body: BodyBytes,
    ) -> Response<ResponseBody>;
}

/// a `FnTrait` holder which represents any async Fn
pub struct FnHandler<F, Args> {
    f: F,
    _phantom: PhantomData<fn(Args)>,
}

impl<F, Args> FnHandler<F, Args>
where
    F: FnTrait<Args>,
{
    fn new(f: F) -> Self {
        Self { f, _phantom: PhantomData }
    }
}

pub fn handler_fn<F, Args>(f: F) -> FnHandler<F, Args>
where
    F: FnTrait<Args>,
{
    FnHandler::new(f)
}

#[async_trait]
impl<F, Args> RequestHandler for FnHandler<F, Args>
where
    F: for<'r> FnTrait<Args::Output<'r>> + Send + Sync,
    for<'r> <F as FnTrait<Args::Output<'r>>>::Output: Responder,
    Args: FromRequest + Send + Sync,
{
    async fn invoke<'server, 'req>(
        &self,
        req: RequestContext<'server, 'req>,
        req_body: BodyBytes,
    ) -> Response<ResponseBody> {
        let args = match Args::from_request(&req, req_body.clone()).await {
            Ok(args) => args,
            Err(e) => return e.response_to(&req),
        };
        let responder = self.f.call(args).await;
        responder.response_to(&req)
    }
}

#[cfg(test)]
mod test {
    use crate::fn_trait::FnTrait;
    use crate::handler::{FnHandler, RequestHandler};
    use http::Method;

    fn assert_is_fn_handler<H: FnTrait<Args>, Args>(_handler: &FnHandler<H, Args>) {
        // no op
    }

    fn assert_is_handler<T: RequestHandler>(_handler: &T) {
        // no op
    }

    #[test]
    fn assert_fn_is_http_handler_1() {
        async fn get(_method: Method) {}

        let http_handler = FnHandler::new(get);
        assert_is_fn_handler(&http_handler);
        assert_is_handler(&http_handler);
    }

    #[test]
    fn assert_fn_is_http_handler_2() {
        async fn get(_method: &Method, _body: String) {}

        let http_handler = FnHandler::new(get);
        assert_is_fn_handler(&http_handler);
        assert_is_handler(&http_handler);
    }
}
