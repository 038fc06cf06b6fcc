//! Connection lifecycle: read, dispatch, write, repeat.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use http::header::CONNECTION;
use http::{Request, Response, StatusCode, Version};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

use crate::codec::{build_error_response, RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, SendError};

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Manages one HTTP connection from accept to shutdown.
///
/// Requests are decoded one at a time with fully buffered bodies, handed to
/// the handler, and the response is written back before the next request is
/// read. The loop ends on clean EOF, on `Connection: close`, or on the first
/// protocol error.
pub struct HttpConnection<R, W> {
    reader: R,
    writer: W,
    read_buf: BytesMut,
    decoder: RequestDecoder,
    encoder: ResponseEncoder,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            read_buf: BytesMut::with_capacity(READ_BUFFER_SIZE),
            decoder: RequestDecoder::new(),
            encoder: ResponseEncoder::new(),
        }
    }

    pub async fn process<H: Handler>(mut self, handler: Arc<H>) -> Result<(), HttpError> {
        loop {
            let request = match self.next_request().await {
                Ok(Some(request)) => request,
                Ok(None) => {
                    info!("no more requests, closing connection");
                    return Ok(());
                }
                Err(e) => {
                    error!("can't decode next request, cause {}", e);
                    self.send_response(build_error_response(StatusCode::BAD_REQUEST), true).await?;
                    return Err(e.into());
                }
            };

            let keep_alive = wants_keep_alive(&request);

            let response = match handler.call(request).await {
                Ok(response) => response,
                Err(e) => {
                    error!("handler error: {}", e);
                    build_error_response(StatusCode::INTERNAL_SERVER_ERROR)
                }
            };

            self.send_response(response, !keep_alive).await?;

            if !keep_alive {
                info!("connection marked for close");
                return Ok(());
            }
        }
    }

    async fn next_request(&mut self) -> Result<Option<Request<Bytes>>, ParseError> {
        loop {
            if let Some(request) = self.decoder.decode(&mut self.read_buf)? {
                return Ok(Some(request));
            }

            let read = self.reader.read_buf(&mut self.read_buf).await.map_err(ParseError::io)?;
            if read == 0 {
                if self.read_buf.is_empty() {
                    return Ok(None);
                }
                return Err(ParseError::invalid_body("connection closed inside a request"));
            }
        }
    }

    async fn send_response(&mut self, mut response: Response<Bytes>, close: bool) -> Result<(), SendError> {
        if close {
            response.headers_mut().insert(CONNECTION, http::HeaderValue::from_static("close"));
        }

        let mut dst = BytesMut::new();
        self.encoder.encode(response, &mut dst)?;
        self.writer.write_all(&dst).await.map_err(SendError::io)?;
        self.writer.flush().await.map_err(SendError::io)
    }
}

/// HTTP/1.1 defaults to keep-alive, HTTP/1.0 to close; an explicit
/// `Connection` header overrides either way.
fn wants_keep_alive<B>(request: &Request<B>) -> bool {
    let connection = request.headers().get(CONNECTION).and_then(|value| value.to_str().ok());
    match request.version() {
        Version::HTTP_10 => connection.is_some_and(|value| value.eq_ignore_ascii_case("keep-alive")),
        _ => !connection.is_some_and(|value| value.eq_ignore_ascii_case("close")),
    }
}
