//! Typed extraction of handler arguments from the request.
//!
//! Handler parameters are filled by [`FromRequest`] implementations: raw
//! bodies (`Bytes`, `String`), header data (`Method`, `HeaderMap`, ...), and
//! the typed wrappers below. Wrapping an extractor in `Result<..>` hands its
//! failure to the handler as a value instead of responding directly.

mod extract_body;
mod extract_form;
mod extract_header;
mod extract_tuple;
mod extract_url;
mod from_request;

pub use from_request::FromRequest;

/// The URL-encoded form body, bound through the target's [`crate::bind::Schema`].
///
/// Fields absent from the body keep their `Default` value; a present but
/// unparsable field fails the extraction with a 400.
///
/// # Example
/// ```
/// # use trellis_web::bind::{BindForm, Schema};
/// # use trellis_web::extract::Form;
/// # use once_cell::sync::Lazy;
/// #[derive(Default, Debug)]
/// struct Signup {
///     name: String,
///     age: u32,
/// }
///
/// impl BindForm for Signup {
///     fn schema() -> &'static Schema<Self> {
///         static SCHEMA: Lazy<Schema<Signup>> = Lazy::new(|| {
///             Schema::builder()
///                 .field("Name", |form: &mut Signup, value: String| form.name = value)
///                 .field("Age", |form: &mut Signup, value: u32| form.age = value)
///                 .build()
///         });
///         &SCHEMA
///     }
/// }
///
/// pub async fn handle(Form(signup): Form<Signup>) -> String {
///     format!("{} is {}", signup.name, signup.age)
/// }
/// ```
pub struct Form<T>(pub T);

/// The body decoded as one JSON document.
///
/// Decode failures can be taken as a value with `Result<Json<T>, _>`,
/// leaving the response to the handler.
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use trellis_web::extract::Json;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     name: String,
///     zip: String,
/// }
///
/// pub async fn handle(Json(params): Json<Params>) -> String {
///     format!("received params: {:?}", params)
/// }
/// ```
pub struct Json<T>(pub T);

/// The URL query string, deserialized with serde.
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use trellis_web::extract::Query;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     name: String,
///     zip: String,
/// }
///
/// pub async fn handle(Query(params): Query<Params>) -> String {
///     format!("received params: {:?}", params)
/// }
/// ```
pub struct Query<T>(pub T);
