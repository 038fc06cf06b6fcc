//! A buffered asynchronous HTTP/1.1 transport
//!
//! This crate is the transport collaborator underneath the `trellis-web`
//! routing layer. It owns the connection lifecycle and the wire format,
//! nothing more:
//!
//! - accepting requests from a byte stream and decoding them into
//!   [`http::Request`] values with fully buffered [`bytes::Bytes`] bodies
//! - handing each decoded request to a [`handler::Handler`]
//! - encoding the handler's [`http::Response`] back onto the stream
//! - keep-alive handling (HTTP/1.1 default on, HTTP/1.0 default off)
//!
//! Bodies are buffered in full before the handler runs, so the layers above
//! never perform I/O of their own. Chunked transfer encoding and streaming
//! responses are deliberately out of scope.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use tokio::net::TcpListener;
//! use trellis_http::connection::HttpConnection;
//! use trellis_http::handler::make_handler;
//!
//! async fn hello(_req: Request<Bytes>) -> Result<Response<Bytes>, Box<dyn std::error::Error + Send + Sync>> {
//!     Ok(Response::new(Bytes::from_static(b"hello world")))
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let handler = Arc::new(make_handler(hello));
//!     loop {
//!         let (stream, _remote_addr) = listener.accept().await?;
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             let _ = connection.process(handler).await;
//!         });
//!     }
//! }
//! ```

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
