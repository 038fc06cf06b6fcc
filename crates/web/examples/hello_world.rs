use trellis_web::guard::{fn_guard, GuardOutcome};
use trellis_web::{handler_fn, RequestContext, Responder, Router, Server};

async fn hello_world() -> &'static str {
    "hello world"
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let router = Router::builder().get("/", handler_fn(hello_world)).build();

    // reject anything without a user-agent before routing runs
    let require_user_agent = fn_guard(|req: &RequestContext| {
        if req.headers().contains_key(http::header::USER_AGENT) {
            GuardOutcome::Pass
        } else {
            GuardOutcome::Halt((http::StatusCode::FORBIDDEN, "user-agent required").response_to(req))
        }
    });

    Server::builder()
        .router(router)
        .bind("127.0.0.1:8080")
        .guard(require_user_agent)
        .build()
        .expect("server setup")
        .start()
        .await
}
