//! The middleware guard chain run ahead of routing.
//!
//! Guards execute synchronously, in registration order, for every request.
//! A guard halts the chain by returning [`GuardOutcome::Halt`] with the
//! response it intends to send; the framework adds nothing to it and skips
//! the remaining guards and the router entirely.

use crate::body::ResponseBody;
use crate::RequestContext;
use http::Response;

pub trait Guard: Send + Sync {
    fn check(&self, req: &RequestContext) -> GuardOutcome;
}

/// The decision of one guard.
pub enum GuardOutcome {
    /// Continue with the next guard, then routing.
    Pass,
    /// Stop now and send this response.
    Halt(Response<ResponseBody>),
}

impl GuardOutcome {
    /// Halts with a bare 200 and no body, for guards that already did their
    /// work through side effects.
    pub fn halt_empty() -> Self {
        Self::Halt(Response::new(ResponseBody::empty()))
    }
}

struct FnGuard<F: Fn(&RequestContext) -> GuardOutcome>(F);

impl<F: Fn(&RequestContext) -> GuardOutcome + Send + Sync> Guard for FnGuard<F> {
    fn check(&self, req: &RequestContext) -> GuardOutcome {
        (self.0)(req)
    }
}

/// Adapts a closure into a [`Guard`].
pub fn fn_guard<F>(f: F) -> impl Guard
where
    F: Fn(&RequestContext) -> GuardOutcome + Send + Sync,
{
    FnGuard(f)
}
