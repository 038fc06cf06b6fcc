use crate::body::BodyBytes;
use crate::{FromRequest, RequestContext};
use async_trait::async_trait;
use bytes::Bytes;
use trellis_http::protocol::ParseError;

/// The raw buffered body.
#[async_trait]
impl FromRequest for Bytes {
    type Output<'r> = Bytes;
    type Error = ParseError;

    async fn from_request<'r>(_req: &'r RequestContext<'_, '_>, body: BodyBytes) -> Result<Self::Output<'r>, Self::Error> {
        body.take()
    }
}

/// The body decoded as UTF-8 text.
#[async_trait]
impl FromRequest for String {
    type Output<'r> = String;
    type Error = ParseError;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, body: BodyBytes) -> Result<Self::Output<'r>, Self::Error> {
        let bytes = Bytes::from_request(req, body).await?;
        match String::from_utf8(bytes.into()) {
            Ok(s) => Ok(s),
            Err(_) => Err(ParseError::invalid_body("request body is not utf8")),
        }
    }
}
