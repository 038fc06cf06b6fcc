//! Core protocol types shared between the codec and the layers above.

mod error;
mod request;

pub use error::{HttpError, ParseError, SendError};
pub use request::RequestHeader;
