//! Wire codec: request decoding and response encoding.
//!
//! The decoder is deliberately stateless: it re-parses the header section on
//! every call until the full request (header plus declared body) is buffered,
//! then splits it off and returns an [`http::Request`] with a `Bytes` body.
//! On the way out, the encoder writes the status line, the header block and
//! the buffered body, filling in `Content-Length` when the handler did not.

use bytes::{Buf, Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use http::{Method, Request, Response, StatusCode, Uri, Version};

use crate::protocol::{ParseError, SendError};

const MAX_HEADER_NUM: usize = 64;
const DEFAULT_MAX_HEADER_SIZE: usize = 8 * 1024;

/// Decodes buffered bytes into complete HTTP/1.x requests.
pub struct RequestDecoder {
    max_header_size: usize,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self { max_header_size: DEFAULT_MAX_HEADER_SIZE }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDecoder {
    /// Attempts to decode one request from `src`.
    ///
    /// Returns `Ok(None)` when more bytes are needed. On success the consumed
    /// bytes are removed from `src`, leaving any pipelined follow-up in place.
    pub fn decode(&self, src: &mut BytesMut) -> Result<Option<Request<Bytes>>, ParseError> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut parsed = httparse::Request::new(&mut headers);

        let header_len = match parsed.parse(src.as_ref()) {
            Ok(httparse::Status::Complete(len)) => len,
            Ok(httparse::Status::Partial) => {
                if src.len() > self.max_header_size {
                    return Err(ParseError::too_large_header(src.len(), self.max_header_size));
                }
                return Ok(None);
            }
            Err(httparse::Error::TooManyHeaders) => return Err(ParseError::too_many_headers(MAX_HEADER_NUM)),
            Err(e) => return Err(ParseError::invalid_header(e)),
        };

        let method =
            Method::from_bytes(parsed.method.ok_or(ParseError::InvalidMethod)?.as_bytes()).map_err(|_| ParseError::InvalidMethod)?;
        let uri = parsed.path.ok_or(ParseError::InvalidUri)?.parse::<Uri>().map_err(|_| ParseError::InvalidUri)?;
        let version = match parsed.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            other => return Err(ParseError::InvalidVersion(other)),
        };

        let mut builder = Request::builder().method(method).uri(uri).version(version);
        {
            // builder holds no error at this point, headers_mut is Some
            let header_map = builder.headers_mut().ok_or_else(|| ParseError::invalid_header("request builder"))?;
            header_map.reserve(parsed.headers.len());
            for header in parsed.headers.iter() {
                let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
                let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
                header_map.append(name, value);
            }
        }

        let body_len = match builder.headers_ref().and_then(|map| map.get(CONTENT_LENGTH)) {
            None => 0,
            Some(value) => {
                let text = value.to_str().map_err(ParseError::invalid_content_length)?;
                text.trim().parse::<usize>().map_err(ParseError::invalid_content_length)?
            }
        };

        let total_len = header_len
            .checked_add(body_len)
            .ok_or_else(|| ParseError::invalid_content_length("declared length overflows the request size"))?;
        if src.len() < total_len {
            return Ok(None);
        }

        src.advance(header_len);
        let body = src.split_to(body_len).freeze();

        builder.body(body).map(Some).map_err(ParseError::invalid_header)
    }
}

/// Encodes a buffered response into its wire form.
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, response: Response<Bytes>, dst: &mut BytesMut) -> Result<(), SendError> {
        let (parts, body) = response.into_parts();

        let version = match parts.version {
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            other => return Err(SendError::invalid_response(format!("unsupported version {other:?}"))),
        };

        dst.extend_from_slice(version.as_bytes());
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(parts.status.as_str().as_bytes());
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(parts.status.canonical_reason().unwrap_or("Unknown").as_bytes());
        dst.extend_from_slice(b"\r\n");

        for (name, value) in parts.headers.iter() {
            dst.extend_from_slice(name.as_str().as_bytes());
            dst.extend_from_slice(b": ");
            dst.extend_from_slice(value.as_bytes());
            dst.extend_from_slice(b"\r\n");
        }

        if !parts.headers.contains_key(CONTENT_LENGTH) {
            dst.extend_from_slice(b"content-length: ");
            dst.extend_from_slice(body.len().to_string().as_bytes());
            dst.extend_from_slice(b"\r\n");
        }

        dst.extend_from_slice(b"\r\n");
        dst.extend_from_slice(&body);
        Ok(())
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a bare response carrying only a status code.
pub fn build_error_response(status: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::{RequestDecoder, ResponseEncoder};
    use crate::protocol::ParseError;
    use bytes::{Bytes, BytesMut};
    use http::{Method, Response, StatusCode, Version};

    fn buf(bytes: &[u8]) -> BytesMut {
        BytesMut::from(bytes)
    }

    #[test]
    fn decode_request_without_body() {
        let decoder = RequestDecoder::new();
        let mut src = buf(b"GET /index HTTP/1.1\r\nHost: localhost\r\n\r\n");

        let request = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().path(), "/index");
        assert_eq!(request.version(), Version::HTTP_11);
        assert_eq!(request.headers().get("host").unwrap(), "localhost");
        assert!(request.body().is_empty());
        assert!(src.is_empty());
    }

    #[test]
    fn decode_request_with_body() {
        let decoder = RequestDecoder::new();
        let mut src = buf(b"POST /submit HTTP/1.1\r\ncontent-length: 7\r\n\r\nName=Ed");

        let request = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.body().as_ref(), b"Name=Ed");
    }

    #[test]
    fn decode_waits_for_full_body() {
        let decoder = RequestDecoder::new();
        let mut src = buf(b"POST /submit HTTP/1.1\r\ncontent-length: 7\r\n\r\nNam");

        assert!(decoder.decode(&mut src).unwrap().is_none());

        src.extend_from_slice(b"e=Ed");
        let request = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(request.body().as_ref(), b"Name=Ed");
    }

    #[test]
    fn decode_waits_for_full_header() {
        let decoder = RequestDecoder::new();
        let mut src = buf(b"GET /ind");
        assert!(decoder.decode(&mut src).unwrap().is_none());
    }

    #[test]
    fn decode_keeps_pipelined_bytes() {
        let decoder = RequestDecoder::new();
        let mut src = buf(b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n");

        let first = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(first.uri().path(), "/a");

        let second = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(second.uri().path(), "/b");
    }

    #[test]
    fn decode_rejects_bad_content_length() {
        let decoder = RequestDecoder::new();
        let mut src = buf(b"POST / HTTP/1.1\r\ncontent-length: nope\r\n\r\n");
        assert!(decoder.decode(&mut src).is_err());
    }

    #[test]
    fn decode_rejects_overflowing_content_length() {
        let decoder = RequestDecoder::new();
        let mut src = buf(b"POST / HTTP/1.1\r\ncontent-length: 18446744073709551615\r\n\r\n");

        let err = decoder.decode(&mut src).unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength { .. }));
    }

    #[test]
    fn decode_rejects_oversized_header_block() {
        let decoder = RequestDecoder::new();
        // header section never terminates and the buffer is already past the cap
        let mut src = buf(b"GET / HTTP/1.1\r\nx-filler: ");
        src.extend_from_slice(&[b'a'; 9 * 1024]);

        let err = decoder.decode(&mut src).unwrap_err();
        assert!(matches!(err, ParseError::TooLargeHeader { .. }));
    }

    #[test]
    fn decode_rejects_too_many_headers() {
        let mut raw = b"GET / HTTP/1.1\r\n".to_vec();
        for i in 0..65 {
            raw.extend_from_slice(format!("x-h{i}: 1\r\n").as_bytes());
        }
        raw.extend_from_slice(b"\r\n");

        let decoder = RequestDecoder::new();
        let mut src = buf(&raw);
        let err = decoder.decode(&mut src).unwrap_err();
        assert!(matches!(err, ParseError::TooManyHeaders { .. }));
    }

    #[test]
    fn decode_custom_method_token() {
        let decoder = RequestDecoder::new();
        let mut src = buf(b"PURGE /cache HTTP/1.1\r\n\r\n");
        let request = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(request.method().as_str(), "PURGE");
    }

    #[test]
    fn encode_fills_content_length() {
        let encoder = ResponseEncoder::new();
        let response = Response::builder().status(StatusCode::OK).body(Bytes::from_static(b"hello")).unwrap();

        let mut dst = BytesMut::new();
        encoder.encode(response, &mut dst).unwrap();

        let text = String::from_utf8(dst.to_vec()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("content-length: 5\r\n"));
        assert!(text.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn encode_keeps_explicit_content_length() {
        let encoder = ResponseEncoder::new();
        let response = Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header(http::header::CONTENT_LENGTH, "0")
            .body(Bytes::new())
            .unwrap();

        let mut dst = BytesMut::new();
        encoder.encode(response, &mut dst).unwrap();

        let text = String::from_utf8(dst.to_vec()).unwrap();
        assert_eq!(text.matches("content-length").count(), 1);
    }
}
