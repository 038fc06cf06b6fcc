use http::Method;
use once_cell::sync::Lazy;
use serde::Deserialize;
use trellis_web::bind::params::{params_fn, ParamMap, Parameter};
use trellis_web::bind::{BindForm, Schema};
use trellis_web::extract::{Form, Json};
use trellis_web::{handler_fn, Router, Server};

#[derive(Default, Debug)]
pub struct User {
    name: String,
    zip: String,
}

impl BindForm for User {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<User>> = Lazy::new(|| {
            Schema::builder()
                .field("name", |user: &mut User, value: String| user.name = value)
                .field("zip", |user: &mut User, value: String| user.zip = value)
                .build()
        });
        &SCHEMA
    }
}

#[derive(Deserialize, Debug)]
pub struct JsonUser {
    name: String,
    zip: String,
}

async fn simple_get(method: &Method) -> String {
    format!("receive from method: {}\r\n", method)
}

// curl -v -d "name=hello&zip=world" http://127.0.0.1:8080/form
async fn form_data(method: &Method, Form(user): Form<User>) -> String {
    format!("receive from method: {}, name: {}, zip: {}\r\n", method, user.name, user.zip)
}

// curl -v -H 'Content-Type: application/json' -d '{"name":"hello","zip":"world"}' http://127.0.0.1:8080/json
async fn json_data(method: &Method, Json(user): Json<JsonUser>) -> String {
    format!("receive from method: {}, receive user: {:#?}\r\n", method, user)
}

// curl -v -d "name=hello&age=36" http://127.0.0.1:8080/signup
async fn signup(params: ParamMap) -> String {
    let name = params.get_str("name").unwrap_or_default();
    let age = params.get_int("age").unwrap_or_default();
    format!("signed up {} ({})\r\n", name, age)
}

async fn default_handler() -> &'static str {
    "404 not found"
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let router = Router::builder()
        .get("/", handler_fn(simple_get))
        .post("/form", handler_fn(form_data))
        .post("/json", handler_fn(json_data))
        .post("/signup", params_fn(vec![Parameter::string("name", true), Parameter::int("age", true)], signup))
        .build();

    Server::builder()
        .router(router)
        .bind("127.0.0.1:8080")
        .default_handler(handler_fn(default_handler))
        .build()
        .expect("server setup")
        .start()
        .await
}
