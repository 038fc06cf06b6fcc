mod body;

mod fn_trait;
mod handler;
mod request;
mod responder;
mod server;

pub mod bind;
pub mod extract;
pub mod guard;
pub mod router;

pub use body::BodyBytes;
pub use body::ResponseBody;
pub use extract::FromRequest;
pub use fn_trait::FnTrait;
pub use handler::handler_fn;
pub use handler::FnHandler;
pub use handler::RequestHandler;
pub use request::RequestContext;
pub use request::RouteParams;
pub use responder::Responder;
pub use router::Router;
pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
