//! Binding of URL-encoded request bodies onto caller-defined types.
//!
//! Two flavors live here:
//!
//! - the schema binder below, which populates a flat record type from the
//!   body through an explicit field-descriptor list declared once per type
//!   (surfaced to handlers as [`crate::extract::Form`]);
//! - the named-parameter binder in [`params`], which validates and converts
//!   an explicit list of [`params::Parameter`]s into a name→value map.
//!
//! Both decode the body as `application/x-www-form-urlencoded` pairs and
//! report failures as recoverable values that respond with a 400.

pub mod params;

use crate::responder::Responder;
use crate::{RequestContext, ResponseBody};
use http::{Response, StatusCode};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use trellis_http::protocol::ParseError;

/// A form-bindable record type.
///
/// Implementors declare their binding schema once; keeping it behind a
/// `Lazy` static makes the descriptor list build once per process:
///
/// ```
/// # use trellis_web::bind::{BindForm, Schema};
/// # use once_cell::sync::Lazy;
/// #[derive(Default)]
/// struct Login {
///     user: String,
/// }
///
/// impl BindForm for Login {
///     fn schema() -> &'static Schema<Self> {
///         static SCHEMA: Lazy<Schema<Login>> = Lazy::new(|| {
///             Schema::builder().field("User", |login: &mut Login, value: String| login.user = value).build()
///         });
///         &SCHEMA
///     }
/// }
/// ```
pub trait BindForm: Default + Sized {
    fn schema() -> &'static Schema<Self>;
}

/// Failures of the body binders. `Display` is the user-visible 400 text.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("{value} is invalid for field {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("malformed body: {reason}")]
    Malformed { reason: String },

    #[error(transparent)]
    Body(#[from] ParseError),
}

impl BindError {
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue { field, value: value.into() }
    }

    pub fn malformed<S: ToString>(reason: S) -> Self {
        Self::Malformed { reason: reason.to_string() }
    }
}

impl Responder for BindError {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        (StatusCode::BAD_REQUEST, self.to_string()).response_to(req)
    }
}

type FieldSetter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), BindError> + Send + Sync>;

struct FieldBinding<T> {
    name: &'static str,
    set: FieldSetter<T>,
}

/// The field-descriptor list of one record type: for every declared field,
/// its form name and a parsing setter. Built once, shared across requests.
pub struct Schema<T> {
    fields: Vec<FieldBinding<T>>,
}

impl<T: Default> Schema<T> {
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Binds a decoded pair list onto a fresh `T::default()`.
    ///
    /// Fields without a matching pair keep their default value; the first
    /// pair wins when a name repeats.
    pub fn bind(&self, pairs: &[(String, String)]) -> Result<T, BindError> {
        let mut target = T::default();
        for field in &self.fields {
            if let Some((_, raw)) = pairs.iter().find(|(name, _)| name == field.name) {
                (field.set)(&mut target, raw)?;
            }
        }
        Ok(target)
    }

    /// Decodes `raw` as URL-encoded pairs and binds them.
    pub fn bind_bytes(&self, raw: &[u8]) -> Result<T, BindError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(raw).map_err(BindError::malformed)?;
        self.bind(&pairs)
    }
}

pub struct SchemaBuilder<T> {
    fields: Vec<FieldBinding<T>>,
}

impl<T: Default + 'static> SchemaBuilder<T> {
    /// Declares one field: its form name, and how to assign the parsed value.
    ///
    /// The value type only needs `FromStr`, which treats string and
    /// numeric/bool fields uniformly.
    pub fn field<V>(mut self, name: &'static str, assign: fn(&mut T, V)) -> Self
    where
        V: FromStr + 'static,
        V::Err: Display,
    {
        let set: FieldSetter<T> = Box::new(move |target, raw| {
            let value = raw.parse::<V>().map_err(|_| BindError::invalid_value(name, raw))?;
            assign(target, value);
            Ok(())
        });
        self.fields.push(FieldBinding { name, set });
        self
    }

    /// Finalizes the schema.
    ///
    /// # Panics
    ///
    /// Panics when no field was declared: a field-less binding target is a
    /// programmer error and must be caught at registration, not per request.
    pub fn build(self) -> Schema<T> {
        assert!(!self.fields.is_empty(), "binding target declares no fields");
        Schema { fields: self.fields }
    }
}

#[cfg(test)]
mod tests {
    use super::{BindForm, Schema};
    use once_cell::sync::Lazy;

    #[derive(Default, Debug, PartialEq)]
    struct Profile {
        name: String,
        age: u32,
        admin: bool,
    }

    impl BindForm for Profile {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: Lazy<Schema<Profile>> = Lazy::new(|| {
                Schema::builder()
                    .field("Name", |p: &mut Profile, v: String| p.name = v)
                    .field("Age", |p: &mut Profile, v: u32| p.age = v)
                    .field("Admin", |p: &mut Profile, v: bool| p.admin = v)
                    .build()
            });
            &SCHEMA
        }
    }

    #[test]
    fn binds_all_fields() {
        let profile = Profile::schema().bind_bytes(b"Name=Ada&Age=36&Admin=true").unwrap();
        assert_eq!(profile, Profile { name: "Ada".into(), age: 36, admin: true });
    }

    #[test]
    fn absent_fields_keep_default() {
        let profile = Profile::schema().bind_bytes(b"Name=Ada").unwrap();
        assert_eq!(profile, Profile { name: "Ada".into(), age: 0, admin: false });
    }

    #[test]
    fn empty_body_is_all_defaults() {
        let profile = Profile::schema().bind_bytes(b"").unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn unknown_pairs_are_ignored() {
        let profile = Profile::schema().bind_bytes(b"Name=Ada&Extra=1").unwrap();
        assert_eq!(profile.name, "Ada");
    }

    #[test]
    fn first_pair_wins_for_repeated_name() {
        let profile = Profile::schema().bind_bytes(b"Age=1&Age=2").unwrap();
        assert_eq!(profile.age, 1);
    }

    #[test]
    fn percent_encoding_is_decoded() {
        let profile = Profile::schema().bind_bytes(b"Name=Ada%20Lovelace").unwrap();
        assert_eq!(profile.name, "Ada Lovelace");
    }

    #[test]
    fn unparsable_field_is_an_error() {
        let err = Profile::schema().bind_bytes(b"Age=abc").unwrap_err();
        assert_eq!(err.to_string(), "abc is invalid for field Age");
    }

    #[test]
    #[should_panic(expected = "binding target declares no fields")]
    fn field_less_schema_panics_at_build() {
        let _ = Schema::<Profile>::builder().build();
    }
}
