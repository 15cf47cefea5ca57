//! Per-request state handed to every stage.
//!
//! A [`RequestContext`] owns the inbound request, the mutable session, the
//! single response slot, and a handle to the shared [`Collaborators`].

mod cancellation;
mod collaborators;
mod request;

pub use cancellation::CancellationToken;
pub use collaborators::Collaborators;
pub use request::RequestContext;
pub use crate::token::Session;
