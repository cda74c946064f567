//! Test fixtures and builders

use std::collections::HashMap;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::claims::IdentityClaims;
use crate::fido2::{Fido2Path, RequestEnvelope};

use super::constants::{TEST_EMAIL, TEST_NAME, TEST_SUB, TEST_USERNAME};

/// Claims with every identity field populated
#[must_use]
pub fn full_claims() -> IdentityClaims {
    IdentityClaims {
        sub: Some(TEST_SUB.to_string()),
        email: Some(TEST_EMAIL.to_string()),
        phone_number: None,
        name: Some(TEST_NAME.to_string()),
        username: Some(TEST_USERNAME.to_string()),
    }
}

/// Claims carrying only a subject id; no resolvable names
#[must_use]
pub fn sub_only_claims() -> IdentityClaims {
    IdentityClaims {
        sub: Some(TEST_SUB.to_string()),
        ..IdentityClaims::default()
    }
}

/// Build an unsigned bearer token whose payload segment carries the claims
///
/// Signature verification happens upstream, so a placeholder signature is
/// enough for the gateway to accept the token.
#[must_use]
pub fn bearer_token(claims: &IdentityClaims) -> String {
    let payload =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).expect("claims serialize to JSON"));
    format!("e30.{payload}.sig")
}

/// Fluent builder for request envelopes
pub struct EnvelopeBuilder {
    path: Fido2Path,
    query: HashMap<String, String>,
    body: Option<String>,
    claims: IdentityClaims,
}

impl EnvelopeBuilder {
    /// Start from a path selector string; defaults to full claims, no query,
    /// no body
    #[must_use]
    pub fn new(selector: &str) -> Self {
        Self {
            path: Fido2Path::parse(selector),
            query: HashMap::new(),
            body: None,
            claims: full_claims(),
        }
    }

    #[must_use]
    pub fn claims(mut self, claims: IdentityClaims) -> Self {
        self.claims = claims;
        self
    }

    #[must_use]
    pub fn rp_id(mut self, rp_id: &str) -> Self {
        self.query.insert("rpId".to_string(), rp_id.to_string());
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> RequestEnvelope {
        RequestEnvelope {
            path: self.path,
            query: self.query,
            body: self.body,
            claims: self.claims,
        }
    }
}
