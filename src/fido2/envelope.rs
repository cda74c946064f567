//! Request and response envelopes
//!
//! The dispatcher is a pure function of a [`RequestEnvelope`] to a
//! [`ResponseEnvelope`] plus collaborator calls; these types are framework
//! neutral so the core can be tested without an HTTP server.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::json;

use crate::claims::IdentityClaims;
use crate::error::GatewayError;
use crate::fido2::path::Fido2Path;

/// Fixed headers applied uniformly to every response
pub const RESPONSE_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/json"),
    ("Cache-Control", "no-store"),
    (
        "Strict-Transport-Security",
        "max-age=31536000; includeSubDomains",
    ),
];

// Bodies for terminal outcomes are fixed; serialize them once.
static NOT_FOUND_BODY: Lazy<String> = Lazy::new(|| json!({"message": "Not found"}).to_string());
static INTERNAL_ERROR_BODY: Lazy<String> =
    Lazy::new(|| json!({"message": "Internal Server Error"}).to_string());

/// One inbound credential API event
///
/// Built fresh per invocation; nothing in it outlives the request.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub path: Fido2Path,
    pub query: HashMap<String, String>,
    pub body: Option<String>,
    pub claims: IdentityClaims,
}

impl RequestEnvelope {
    /// The relying-party id query parameter, if supplied
    #[must_use]
    pub fn rp_id(&self) -> Option<&str> {
        self.query.get("rpId").map(String::as_str)
    }
}

/// One outbound response: status, optional serialized body, fixed headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub body: Option<String>,
    pub headers: &'static [(&'static str, &'static str)],
}

impl ResponseEnvelope {
    /// A response with a serialized JSON payload
    ///
    /// # Errors
    ///
    /// Returns an internal error if serialization fails.
    pub fn json<T: Serialize>(status: u16, payload: &T) -> Result<Self, GatewayError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| GatewayError::internal(format!("failed to serialize response: {e}")))?;
        Ok(Self {
            status,
            body: Some(body),
            headers: RESPONSE_HEADERS,
        })
    }

    /// A response with a status and no body
    #[must_use]
    pub fn status_only(status: u16) -> Self {
        Self {
            status,
            body: None,
            headers: RESPONSE_HEADERS,
        }
    }

    /// A response with a `{"message": ...}` body
    #[must_use]
    pub fn message(status: u16, message: &str) -> Self {
        Self {
            status,
            body: Some(json!({ "message": message }).to_string()),
            headers: RESPONSE_HEADERS,
        }
    }

    /// The terminal response for an unmatched selector
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: Some(NOT_FOUND_BODY.clone()),
            headers: RESPONSE_HEADERS,
        }
    }

    /// The uniform response for internal failures; detail stays in the log
    #[must_use]
    pub fn internal_error() -> Self {
        Self {
            status: 500,
            body: Some(INTERNAL_ERROR_BODY.clone()),
            headers: RESPONSE_HEADERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_body_is_exact() {
        let response = ResponseEnvelope::not_found();
        assert_eq!(response.status, 404);
        assert_eq!(response.body.as_deref(), Some(r#"{"message":"Not found"}"#));
    }

    #[test]
    fn internal_error_never_carries_detail() {
        let response = ResponseEnvelope::internal_error();
        assert_eq!(response.status, 500);
        assert_eq!(
            response.body.as_deref(),
            Some(r#"{"message":"Internal Server Error"}"#)
        );
    }

    #[test]
    fn every_response_carries_the_fixed_headers() {
        for response in [
            ResponseEnvelope::not_found(),
            ResponseEnvelope::status_only(204),
            ResponseEnvelope::message(400, "Missing RP ID"),
        ] {
            assert_eq!(response.headers, RESPONSE_HEADERS);
        }
    }

    #[test]
    fn rp_id_reads_the_query_parameter() {
        let mut query = HashMap::new();
        query.insert("rpId".to_string(), "example.com".to_string());
        let envelope = RequestEnvelope {
            path: Fido2Path::AuthenticatorsList,
            query,
            body: None,
            claims: IdentityClaims::default(),
        };
        assert_eq!(envelope.rp_id(), Some("example.com"));
    }
}
