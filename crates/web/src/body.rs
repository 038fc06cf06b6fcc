//! Request and response body containers.
//!
//! The transport buffers request bodies in full before dispatch, so the body
//! seen by extractors is a plain byte buffer behind a consume-once guard:
//! cloning [`BodyBytes`] shares the same underlying slot, and only the first
//! taker gets the bytes. Response bodies are single-shot byte payloads.

use bytes::Bytes;
use std::sync::{Arc, Mutex};
use trellis_http::protocol::ParseError;

/// A fully buffered request body that can be consumed exactly once.
///
/// Handed to every extractor of a request; extractors that do not need the
/// body just ignore it. Taking it twice is an error, mirroring the fact that
/// a streaming body could not be re-read either.
#[derive(Clone)]
pub struct BodyBytes {
    inner: Arc<Mutex<Option<Bytes>>>,
}

impl From<Bytes> for BodyBytes {
    fn from(bytes: Bytes) -> Self {
        Self { inner: Arc::new(Mutex::new(Some(bytes))) }
    }
}

impl BodyBytes {
    pub fn empty() -> Self {
        Self::from(Bytes::new())
    }

    /// Whether the body is still available to take.
    pub fn can_consume(&self) -> bool {
        self.lock().is_some()
    }

    /// Takes the buffered bytes, failing if some extractor already did.
    pub fn take(&self) -> Result<Bytes, ParseError> {
        self.lock().take().ok_or_else(|| ParseError::invalid_body("body has been consumed"))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Bytes>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A buffered response body.
pub struct ResponseBody {
    inner: Option<Bytes>,
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn once(bytes: Bytes) -> Self {
        Self { inner: Some(bytes) }
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, Bytes::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Bytes {
        self.inner.unwrap_or_default()
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        Self::once(bytes)
    }
}

impl From<String> for ResponseBody {
    fn from(value: String) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<&'static str> for ResponseBody {
    fn from(value: &'static str) -> Self {
        if value.is_empty() {
            Self::empty()
        } else {
            Self::once(Bytes::from_static(value.as_bytes()))
        }
    }
}

impl From<()> for ResponseBody {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl From<Option<Bytes>> for ResponseBody {
    fn from(option: Option<Bytes>) -> Self {
        match option {
            Some(bytes) => Self::once(bytes),
            None => Self::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BodyBytes, ResponseBody};
    use bytes::Bytes;

    #[test]
    fn body_is_consumed_once() {
        let body = BodyBytes::from(Bytes::from_static(b"payload"));
        let shared = body.clone();

        assert!(body.can_consume());
        assert_eq!(shared.take().unwrap().as_ref(), b"payload");

        assert!(!body.can_consume());
        assert!(body.take().is_err());
    }

    #[test]
    fn response_body_conversions() {
        assert!(ResponseBody::from(()).is_empty());
        assert!(ResponseBody::from("").is_empty());
        assert_eq!(ResponseBody::from("hi").into_bytes().as_ref(), b"hi");
        assert_eq!(ResponseBody::from(String::from("yo")).len(), 2);
    }
}
