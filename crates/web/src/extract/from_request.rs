use crate::body::BodyBytes;
use crate::responder::Responder;
use crate::{RequestContext, ResponseBody};
use async_trait::async_trait;
use http::{Response, StatusCode};
use trellis_http::protocol::ParseError;

/// Produces one handler argument from the request.
///
/// `Output<'r>` lets borrowing extractors (`&Method`, `&HeaderMap`, ...) tie
/// their result to the request; the error must know how to respond for
/// itself, which is how extraction failures surface as 4xx responses.
#[async_trait]
pub trait FromRequest {
    type Output<'r>: Send;
    type Error: Responder + Send;
    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: BodyBytes) -> Result<Self::Output<'r>, Self::Error>;
}

/// Optional extraction: a failure becomes `None` instead of a response.
#[async_trait]
impl<T> FromRequest for Option<T>
where
    T: FromRequest,
{
    type Output<'r> = Option<T::Output<'r>>;
    type Error = T::Error;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: BodyBytes) -> Result<Self::Output<'r>, Self::Error> {
        match T::from_request(req, body.clone()).await {
            Ok(t) => Ok(Some(t)),
            Err(_) => Ok(None),
        }
    }
}

/// Hands the extraction result to the handler as a value, letting it decide
/// the user-visible response itself.
#[async_trait]
impl<T> FromRequest for Result<T, T::Error>
where
    T: FromRequest,
{
    type Output<'r> = Result<T::Output<'r>, T::Error>;
    type Error = ParseError;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: BodyBytes) -> Result<Self::Output<'r>, Self::Error> {
        Ok(T::from_request(req, body).await)
    }
}

#[async_trait]
impl FromRequest for () {
    type Output<'r> = ();
    type Error = ParseError;

    async fn from_request<'r>(_req: &'r RequestContext<'_, '_>, _body: BodyBytes) -> Result<Self::Output<'r>, Self::Error> {
        Ok(())
    }
}

impl Responder for ParseError {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            ParseError::TooLargeHeader { .. } => {
                (StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE, "header too large").response_to(req)
            }
            ParseError::TooManyHeaders { .. } => (StatusCode::BAD_REQUEST, "too many headers").response_to(req),
            ParseError::InvalidHeader { .. } => (StatusCode::BAD_REQUEST, "invalid header").response_to(req),
            ParseError::InvalidVersion(_) => (StatusCode::BAD_REQUEST, "invalid version").response_to(req),
            ParseError::InvalidMethod => (StatusCode::BAD_REQUEST, "invalid method").response_to(req),
            ParseError::InvalidUri => (StatusCode::BAD_REQUEST, "invalid uri").response_to(req),
            ParseError::InvalidContentLength { .. } => {
                (StatusCode::BAD_REQUEST, "invalid content length").response_to(req)
            }
            ParseError::InvalidBody { .. } => (StatusCode::BAD_REQUEST, "invalid body").response_to(req),
            ParseError::Io { .. } => (StatusCode::BAD_REQUEST, "connection error").response_to(req),
        }
    }
}
