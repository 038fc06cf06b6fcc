//! URL query string extraction.
//!
//! Allows handlers to receive strongly typed query parameters by
//! implementing [`FromRequest`] for [`Query<T>`].

use crate::body::BodyBytes;
use crate::extract::{FromRequest, Query};
use crate::RequestContext;
use async_trait::async_trait;
use serde::Deserialize;
use trellis_http::protocol::ParseError;

#[async_trait]
impl<T> FromRequest for Query<T>
where
    T: for<'de> Deserialize<'de> + Send,
{
    type Output<'r> = Query<T>;
    type Error = ParseError;

    async fn from_request<'r>(req: &'r RequestContext<'_, '_>, _body: BodyBytes) -> Result<Self::Output<'r>, Self::Error> {
        let query = req.uri().query().ok_or_else(|| ParseError::invalid_header("request has no query string"))?;
        serde_qs::from_str::<T>(query).map(Query).map_err(ParseError::invalid_header)
    }
}

#[cfg(test)]
mod tests {
    use crate::body::BodyBytes;
    use crate::extract::{FromRequest, Query};
    use crate::{RequestContext, RouteParams};
    use http::Request;
    use serde::Deserialize;
    use trellis_http::protocol::RequestHeader;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Filter {
        term: String,
        limit: u32,
    }

    #[tokio::test]
    async fn query_extraction() {
        let (parts, ()) = Request::builder().uri("/search?term=rust&limit=10").body(()).unwrap().into_parts();
        let header = RequestHeader::from(parts);
        let params = RouteParams::empty();
        let ctx = RequestContext::new(&header, &params);

        let Query(filter) = Query::<Filter>::from_request(&ctx, BodyBytes::empty()).await.unwrap();
        assert_eq!(filter, Filter { term: "rust".into(), limit: 10 });
    }

    #[tokio::test]
    async fn missing_query_fails() {
        let (parts, ()) = Request::builder().uri("/search").body(()).unwrap().into_parts();
        let header = RequestHeader::from(parts);
        let params = RouteParams::empty();
        let ctx = RequestContext::new(&header, &params);

        assert!(Query::<Filter>::from_request(&ctx, BodyBytes::empty()).await.is_err());
    }
}
