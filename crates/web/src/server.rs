//! Server assembly and the dispatch pipeline.
//!
//! [`Server`] owns the routing table, the guard chain and the optional
//! default handler, and implements the transport's [`Handler`] seam: every
//! decoded request runs guards first, then the router, then falls back to
//! the default handler or a 404.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response, StatusCode};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use trellis_http::connection::HttpConnection;
use trellis_http::handler::{Handler, HandlerError};
use trellis_http::protocol::RequestHeader;

use crate::body::{BodyBytes, ResponseBody};
use crate::guard::{Guard, GuardOutcome};
use crate::handler::RequestHandler;
use crate::router::Router;
use crate::{RequestContext, RouteParams};

/// Misconfiguration caught when assembling a [`Server`].
#[derive(Debug, Error)]
pub enum ServerBuildError {
    #[error("no router configured")]
    MissingRouter,

    #[error("no bind address configured")]
    MissingAddress,

    #[error("bind address did not resolve")]
    InvalidAddress(#[from] io::Error),
}

pub struct ServerBuilder {
    router: Option<Router>,
    default_handler: Option<Box<dyn RequestHandler>>,
    guards: Vec<Box<dyn Guard>>,
    addresses: Option<io::Result<Vec<SocketAddr>>>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, default_handler: None, guards: Vec::new(), addresses: None }
    }

    /// Sets the address(es) to listen on. Resolution happens here, so a bad
    /// address surfaces at `build()` instead of at `start()`.
    pub fn bind(mut self, addr: impl ToSocketAddrs) -> Self {
        self.addresses = Some(addr.to_socket_addrs().map(Iterator::collect));
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Appends a guard; guards run in registration order ahead of routing.
    pub fn guard(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Handler invoked when no route matches, instead of the built-in 404.
    pub fn default_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.default_handler = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let addresses = self.addresses.ok_or(ServerBuildError::MissingAddress)??;
        if addresses.is_empty() {
            return Err(ServerBuildError::InvalidAddress(io::Error::new(
                io::ErrorKind::InvalidInput,
                "address resolved to nothing",
            )));
        }
        Ok(Server { router, default_handler: self.default_handler, guards: self.guards, addresses })
    }
}

pub struct Server {
    router: Router,
    default_handler: Option<Box<dyn RequestHandler>>,
    guards: Vec<Box<dyn Guard>>,
    addresses: Vec<SocketAddr>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Binds the listener and serves connections until the task is dropped.
    ///
    /// Each accepted connection runs in its own task; the server itself is
    /// shared behind an `Arc`.
    pub async fn start(self) -> io::Result<()> {
        let _ = tracing::subscriber::set_global_default(FmtSubscriber::new());

        let listener = TcpListener::bind(self.addresses.as_slice()).await?;
        info!("listening on {}", listener.local_addr()?);

        let server = Arc::new(self);
        loop {
            let (stream, peer) = listener.accept().await?;
            debug!("accepted connection from {peer}");

            let server = Arc::clone(&server);
            tokio::spawn(async move {
                let (reader, writer) = stream.into_split();
                if let Err(e) = HttpConnection::new(reader, writer).process(server).await {
                    warn!("connection from {peer} ended with error: {e}");
                }
            });
        }
    }

    async fn dispatch(&self, header: RequestHeader, body: BodyBytes) -> Response<ResponseBody> {
        // guards run before routing and therefore see no route captures
        let no_params = RouteParams::empty();
        let guard_ctx = RequestContext::new(&header, &no_params);
        for guard in &self.guards {
            if let GuardOutcome::Halt(response) = guard.check(&guard_ctx) {
                debug!("guard halted {} {}", header.method(), header.uri().path());
                return response;
            }
        }

        match self.router.at(header.method(), header.uri().path()) {
            Some(matched) => {
                let params = matched.params();
                let ctx = RequestContext::new(&header, &params);
                matched.handler().invoke(ctx, body).await
            }
            None => {
                error!("no route for {} {}", header.method(), header.uri().path());
                match &self.default_handler {
                    Some(handler) => handler.invoke(RequestContext::new(&header, &no_params), body).await,
                    None => {
                        let mut response = Response::new(ResponseBody::empty());
                        *response.status_mut() = StatusCode::NOT_FOUND;
                        response
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Handler for Server {
    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        let (parts, body) = req.into_parts();
        let header = RequestHeader::from(parts);
        // the decoder rejects unparsable content-length before dispatch
        let declared = header.content_length().unwrap_or(0);
        info!("{} {} (content-length {})", header.method(), header.uri().path(), declared);

        let response = self.dispatch(header, BodyBytes::from(body)).await;
        Ok(response.map(ResponseBody::into_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::Server;
    use crate::bind::params::{params_fn, ParamMap, Parameter};
    use crate::guard::{fn_guard, GuardOutcome};
    use crate::responder::Responder;
    use crate::router::Router;
    use crate::{handler_fn, RequestContext};
    use bytes::Bytes;
    use http::{Method, Request, StatusCode};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use trellis_http::handler::Handler;

    async fn index() -> &'static str {
        "index"
    }

    fn request(method: Method, uri: &str, body: &'static [u8]) -> Request<Bytes> {
        Request::builder().method(method).uri(uri).body(Bytes::from_static(body)).unwrap()
    }

    fn server_with(router: Router) -> Server {
        Server::builder().router(router).bind("127.0.0.1:0").build().unwrap()
    }

    #[tokio::test]
    async fn routes_and_answers() {
        let server = server_with(Router::builder().get("/index", handler_fn(index)).build());

        let response = server.call(request(Method::GET, "/index", b"")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"index");
    }

    #[tokio::test]
    async fn dispatch_with_declared_content_length() {
        async fn echo(body: String) -> String {
            body
        }

        let server = server_with(Router::builder().post("/echo", handler_fn(echo)).build());

        let req = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .header(http::header::CONTENT_LENGTH, "7")
            .body(Bytes::from_static(b"payload"))
            .unwrap();

        let response = server.call(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"payload");
    }

    #[tokio::test]
    async fn unmatched_request_is_404() {
        let server = server_with(Router::builder().get("/index", handler_fn(index)).build());

        let response = server.call(request(Method::POST, "/index", b"")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn default_handler_catches_unmatched() {
        async fn fallback() -> (StatusCode, &'static str) {
            (StatusCode::OK, "fallback")
        }

        let server = Server::builder()
            .router(Router::builder().get("/index", handler_fn(index)).build())
            .default_handler(handler_fn(fallback))
            .bind("127.0.0.1:0")
            .build()
            .unwrap();

        let response = server.call(request(Method::GET, "/missing", b"")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"fallback");
    }

    #[tokio::test]
    async fn halting_guard_skips_later_guards_and_routing() {
        let reached = Arc::new(AtomicBool::new(false));
        let reached_by_later_guard = Arc::clone(&reached);

        let server = Server::builder()
            .router(Router::builder().get("/index", handler_fn(index)).build())
            .guard(fn_guard(|req: &RequestContext| {
                GuardOutcome::Halt((StatusCode::FORBIDDEN, "denied").response_to(req))
            }))
            .guard(fn_guard(move |_req| {
                reached_by_later_guard.store(true, Ordering::SeqCst);
                GuardOutcome::Pass
            }))
            .bind("127.0.0.1:0")
            .build()
            .unwrap();

        let response = server.call(request(Method::GET, "/index", b"")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.body().as_ref(), b"denied");
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn passing_guards_reach_the_route() {
        let server = Server::builder()
            .router(Router::builder().get("/index", handler_fn(index)).build())
            .guard(fn_guard(|_req| GuardOutcome::Pass))
            .bind("127.0.0.1:0")
            .build()
            .unwrap();

        let response = server.call(request(Method::GET, "/index", b"")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn parameter_binding_rejects_with_exact_message() {
        async fn signup(params: ParamMap) -> String {
            format!("age={}", params.get_int("age").unwrap_or_default())
        }

        let handler = params_fn(vec![Parameter::int("age", true)], signup);
        let server = server_with(Router::builder().post("/signup", handler).build());

        let ok = server.call(request(Method::POST, "/signup", b"age=36")).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(ok.body().as_ref(), b"age=36");

        let missing = server.call(request(Method::POST, "/signup", b"name=Ada")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.body().as_ref(), b"age is required");
    }

    #[tokio::test]
    async fn patterned_route_matches_concrete_path() {
        async fn show_user() -> &'static str {
            "user"
        }

        let server = server_with(Router::builder().get("/users/{id}", handler_fn(show_user)).build());
        let response = server.call(request(Method::GET, "/users/42", b"")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"user");
    }

    #[test]
    fn build_without_router_fails() {
        let result = Server::builder().bind("127.0.0.1:0").build();
        assert!(result.is_err());
    }

    #[test]
    fn build_without_address_fails() {
        let result = Server::builder().router(Router::builder().get("/", handler_fn(index)).build()).build();
        assert!(result.is_err());
    }
}
