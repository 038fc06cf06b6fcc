//! Body binding extractors: URL-encoded forms and JSON documents.

use crate::bind::{BindError, BindForm};
use crate::body::BodyBytes;
use crate::extract::{Form, FromRequest, Json};
use crate::RequestContext;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Binds an URL-encoded body through the target's declared schema.
#[async_trait]
impl<T> FromRequest for Form<T>
where
    T: BindForm + Send + 'static,
{
    type Output<'r> = Form<T>;
    type Error = BindError;

    async fn from_request<'r>(_req: &'r RequestContext<'_, '_>, body: BodyBytes) -> Result<Self::Output<'r>, Self::Error> {
        let bytes = body.take()?;
        T::schema().bind_bytes(&bytes).map(Form)
    }
}

/// Decodes the whole body as a single JSON document.
#[async_trait]
impl<T> FromRequest for Json<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output<'r> = Json<T>;
    type Error = BindError;

    async fn from_request<'r>(_req: &'r RequestContext<'_, '_>, body: BodyBytes) -> Result<Self::Output<'r>, Self::Error> {
        let bytes = body.take()?;
        serde_json::from_slice::<T>(&bytes).map(Json).map_err(BindError::malformed)
    }
}
