//! The named-parameter binder: an explicit list of typed, optionally
//! required inputs validated and converted out of an URL-encoded body.
//!
//! Unlike the schema binder, no target type is involved; the result is a
//! name→value map. Binding stops at the first missing required or invalid
//! parameter and answers with a 400 whose body is exactly
//! `"<name> is required"` or `"<value> is invalid for parameter <name>"`.

use crate::body::{BodyBytes, ResponseBody};
use crate::handler::RequestHandler;
use crate::responder::Responder;
use crate::RequestContext;
use async_trait::async_trait;
use http::{Response, StatusCode};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// One named, typed, optionally required input value.
pub struct Parameter {
    name: String,
    required: bool,
    kind: ParamKind,
}

type ValidFn = Box<dyn Fn(&str) -> bool + Send + Sync>;
type ConvertFn = Box<dyn Fn(&str) -> ParamValue + Send + Sync>;

/// The closed set of parameter behaviors; arbitrary typed parameters go
/// through `Custom`.
enum ParamKind {
    Str,
    Int,
    Custom { valid: ValidFn, convert: ConvertFn },
}

impl Parameter {
    /// A string parameter: every value is valid, conversion is identity.
    pub fn string(name: impl Into<String>, required: bool) -> Self {
        Self { name: name.into(), required, kind: ParamKind::Str }
    }

    /// An integer parameter: valid iff the value parses as a base-10 `i64`.
    pub fn int(name: impl Into<String>, required: bool) -> Self {
        Self { name: name.into(), required, kind: ParamKind::Int }
    }

    /// A parameter with a caller-supplied predicate and converter, for
    /// typed values beyond strings and integers (dates, enums, ...).
    ///
    /// The converter runs only on values the predicate accepted.
    pub fn custom<V, C, T>(name: impl Into<String>, required: bool, valid: V, convert: C) -> Self
    where
        V: Fn(&str) -> bool + Send + Sync + 'static,
        C: Fn(&str) -> T + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            required,
            kind: ParamKind::Custom {
                valid: Box::new(valid),
                convert: Box::new(move |raw| ParamValue::Other(Box::new(convert(raw)))),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required(&self) -> bool {
        self.required
    }

    fn valid(&self, value: &str) -> bool {
        match &self.kind {
            ParamKind::Str => true,
            ParamKind::Int => value.parse::<i64>().is_ok(),
            ParamKind::Custom { valid, .. } => valid(value),
        }
    }

    fn value(&self, value: &str) -> ParamValue {
        match &self.kind {
            ParamKind::Str => ParamValue::Str(value.to_owned()),
            // validity was already checked, a parse failure can't happen
            ParamKind::Int => ParamValue::Int(value.parse::<i64>().unwrap_or_default()),
            ParamKind::Custom { convert, .. } => convert(value),
        }
    }
}

/// A converted parameter value.
pub enum ParamValue {
    Str(String),
    Int(i64),
    Other(Box<dyn Any + Send + Sync>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Accesses a `Custom` parameter's converted value.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            ParamValue::Other(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(value) => f.debug_tuple("Str").field(value).finish(),
            ParamValue::Int(value) => f.debug_tuple("Int").field(value).finish(),
            ParamValue::Other(_) => f.debug_tuple("Other").finish(),
        }
    }
}

/// The bound name→value mapping handed to the handler.
///
/// Optional parameters absent from the body have no entry.
#[derive(Debug, Default)]
pub struct ParamMap {
    values: HashMap<String, ParamValue>,
}

impl ParamMap {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    /// Typed access to a `Custom` parameter's converted value.
    pub fn get_other<T: 'static>(&self, name: &str) -> Option<&T> {
        self.get(name).and_then(ParamValue::downcast_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validation failures; `Display` is the exact 400 body text.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("{name} is required")]
    Required { name: String },

    #[error("{value} is invalid for parameter {name}")]
    Invalid { value: String, name: String },

    #[error("malformed body: {reason}")]
    Malformed { reason: String },
}

impl Responder for ParamError {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        (StatusCode::BAD_REQUEST, self.to_string()).response_to(req)
    }
}

/// Binds an URL-encoded body against a parameter list, in list order,
/// stopping at the first failure.
pub fn bind_params(parameters: &[Parameter], raw: &[u8]) -> Result<ParamMap, ParamError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(raw).map_err(|e| ParamError::Malformed { reason: e.to_string() })?;

    let mut map = ParamMap::default();
    for parameter in parameters {
        let found = pairs.iter().find(|(name, _)| name == parameter.name());
        match found {
            None => {
                if parameter.required() {
                    return Err(ParamError::Required { name: parameter.name().to_owned() });
                }
            }
            Some((_, raw_value)) => {
                if !parameter.valid(raw_value) {
                    return Err(ParamError::Invalid { value: raw_value.clone(), name: parameter.name().to_owned() });
                }
                map.values.insert(parameter.name().to_owned(), parameter.value(raw_value));
            }
        }
    }
    Ok(map)
}

/// Adapts an async function over a [`ParamMap`] into a route handler that
/// binds the declared parameters before calling it.
pub fn params_fn<F, Fut>(parameters: Vec<Parameter>, f: F) -> ParamsHandler<F>
where
    F: Fn(ParamMap) -> Fut + Send + Sync,
    Fut: Future + Send,
    Fut::Output: Responder,
{
    ParamsHandler { parameters, f }
}

pub struct ParamsHandler<F> {
    parameters: Vec<Parameter>,
    f: F,
}

#[async_trait]
impl<F, Fut> RequestHandler for ParamsHandler<F>
where
    F: Fn(ParamMap) -> Fut + Send + Sync,
    Fut: Future + Send,
    Fut::Output: Responder,
{
    async fn invoke<'server, 'req>(
        &self,
        req: RequestContext<'server, 'req>,
        req_body: BodyBytes,
    ) -> Response<ResponseBody> {
        let raw = match req_body.take() {
            Ok(raw) => raw,
            Err(e) => return e.response_to(&req),
        };
        match bind_params(&self.parameters, &raw) {
            Ok(map) => (self.f)(map).await.response_to(&req),
            Err(e) => e.response_to(&req),
        }
    }
}
