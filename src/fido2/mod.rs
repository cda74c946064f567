//! FIDO2 credential API core
//!
//! The envelope types, the operation selector, and the dispatcher that ties
//! claim resolution, per-operation validation, and collaborator calls into
//! one response per request.

mod dispatcher;
mod envelope;
mod path;

pub use dispatcher::Dispatcher;
pub use envelope::{RequestEnvelope, ResponseEnvelope, RESPONSE_HEADERS};
pub use path::Fido2Path;
