//! Claim resolution
//!
//! Extracts and normalizes caller identity from the token payload attached to
//! the incoming event. The token itself was verified by the upstream
//! authorizer; this module only interprets the claims it asserted. All
//! functions here are pure and allocate only for their return values.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw identity claims from the inbound token
///
/// Constructed once per request and never persisted. Every field is optional;
/// resolution into a usable identity happens in [`ResolvedIdentity`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject identifier assigned by the identity provider
    pub sub: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub name: Option<String>,
    /// Provider-assigned username; some providers namespace the claim
    #[serde(alias = "cognito:username", alias = "preferred_username")]
    pub username: Option<String>,
}

/// Errors raised while interpreting identity claims
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// Neither a subject id nor a provider username was present. Upstream
    /// authentication should make this impossible; the check is defensive.
    #[error("unable to determine user handle from claims")]
    MissingUserHandle,

    /// The bearer token payload could not be decoded
    #[error("malformed bearer token: {0}")]
    MalformedToken(String),
}

impl IdentityClaims {
    /// Decode claims from the payload segment of a bearer token
    ///
    /// The signature is NOT verified here: the upstream authorizer has
    /// already validated the token before the event reaches this service.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::MalformedToken`] if the token has no payload
    /// segment or the segment is not base64url-encoded JSON.
    pub fn from_bearer(token: &str) -> Result<Self, ClaimsError> {
        let payload = token
            .split('.')
            .nth(1)
            .ok_or_else(|| ClaimsError::MalformedToken("missing payload segment".into()))?;
        let decoded = URL_SAFE_NO_PAD
            .decode(payload.as_bytes())
            .map_err(|e| ClaimsError::MalformedToken(e.to_string()))?;
        serde_json::from_slice(&decoded).map_err(|e| ClaimsError::MalformedToken(e.to_string()))
    }
}

/// Caller identity after ordered-fallback resolution
///
/// `user_name` and `display_name` may legitimately be absent; operations that
/// require them must check explicitly rather than assume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Stable identifier keying all credential operations for this caller
    pub user_handle: String,
    pub user_name: Option<String>,
    pub display_name: Option<String>,
}

impl ResolvedIdentity {
    /// Resolve claims into an identity
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::MissingUserHandle`] if no user handle can be
    /// derived.
    pub fn from_claims(claims: &IdentityClaims) -> Result<Self, ClaimsError> {
        Ok(Self {
            user_handle: derive_user_handle(claims)?,
            user_name: resolve_user_name(claims),
            display_name: resolve_display_name(claims),
        })
    }
}

/// Derive the stable user handle: subject id preferred, provider username as
/// fallback
///
/// The same claims always yield the same handle; nothing here is cached or
/// invented.
///
/// # Errors
///
/// Returns [`ClaimsError::MissingUserHandle`] if both sources are absent or
/// empty.
pub fn derive_user_handle(claims: &IdentityClaims) -> Result<String, ClaimsError> {
    non_empty(claims.sub.as_deref())
        .or_else(|| non_empty(claims.username.as_deref()))
        .map(ToString::to_string)
        .ok_or(ClaimsError::MissingUserHandle)
}

/// First non-empty of email, phone number, name, provider username
#[must_use]
pub fn resolve_user_name(claims: &IdentityClaims) -> Option<String> {
    non_empty(claims.email.as_deref())
        .or_else(|| non_empty(claims.phone_number.as_deref()))
        .or_else(|| non_empty(claims.name.as_deref()))
        .or_else(|| non_empty(claims.username.as_deref()))
        .map(ToString::to_string)
}

/// First non-empty of name, email
#[must_use]
pub fn resolve_display_name(claims: &IdentityClaims) -> Option<String> {
    non_empty(claims.name.as_deref())
        .or_else(|| non_empty(claims.email.as_deref()))
        .map(ToString::to_string)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
