//! Gateway error taxonomy
//!
//! Every failure inside the dispatcher is classified into one of two kinds:
//! errors whose message is safe to return to the caller, and everything else.
//! The top-level dispatcher maps the first kind to a 400 response with the
//! message and the second kind to a generic 500, logging the detail for
//! operators only.

use thiserror::Error;

use crate::claims::ClaimsError;
use crate::credentials::CredentialError;

/// Errors raised while handling a credential API request
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A caller mistake the caller can correct; the message is returned
    /// verbatim in a 400 response body
    #[error("{0}")]
    UserFacing(String),

    /// Anything else; detail is logged but never leaves the process
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    /// Create a user-facing validation error
    pub fn user_facing(message: impl Into<String>) -> Self {
        Self::UserFacing(message.into())
    }

    /// Create an internal error from a plain message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(anyhow::anyhow!(message.into()))
    }
}

impl From<ClaimsError> for GatewayError {
    // Claim resolution failures always map to 500; the message stays in
    // the log
    fn from(err: ClaimsError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl From<CredentialError> for GatewayError {
    fn from(err: CredentialError) -> Self {
        match err {
            // Collaborators may surface their own caller-correctable errors
            CredentialError::Validation(message) => Self::UserFacing(message),
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}
