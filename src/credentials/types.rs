//! Wire types for credential operations
//!
//! Serializable structures exchanged with the credential collaborator and,
//! through it, with WebAuthn clients. Field names follow the WebAuthn wire
//! convention (camelCase).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inputs for a registration challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub user_id: String,
    pub name: String,
    pub display_name: String,
    pub rp_id: String,
}

/// Credential creation options sent to the client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOptions {
    pub challenge: String, // Base64URL-encoded random challenge
    pub rp: RelyingParty,
    pub user: UserEntity,
    pub pub_key_cred_params: Vec<PublicKeyCredentialParameters>,
    pub timeout: u32,        // Timeout in milliseconds
    pub attestation: String, // "none", "indirect", "direct"
    pub authenticator_selection: AuthenticatorSelectionCriteria,
}

/// Relying party information
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RelyingParty {
    pub id: String,   // Domain name (e.g., "example.com")
    pub name: String, // Display name
}

/// User entity embedded in creation options
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub id: String,           // Base64URL-encoded user handle
    pub name: String,         // Username (e.g., email)
    pub display_name: String, // Display name
}

/// Public key credential parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyCredentialParameters {
    pub r#type: String, // Always "public-key"
    pub alg: i32,       // Algorithm identifier (-7 for ES256, -257 for RS256)
}

/// Authenticator selection criteria
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelectionCriteria {
    pub authenticator_attachment: Option<String>, // "platform", "cross-platform"
    pub require_resident_key: bool,
    pub user_verification: String, // "required", "preferred", "discouraged"
}

/// A registered credential record as stored by the collaborator
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
    pub credential_id: String, // Base64URL-encoded credential ID
    pub user_handle: String,
    pub rp_id: String,
    pub friendly_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

/// A credential as listed back to the caller
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub credential_id: String,
    pub friendly_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

impl From<&StoredCredential> for CredentialSummary {
    fn from(credential: &StoredCredential) -> Self {
        Self {
            credential_id: credential.credential_id.clone(),
            friendly_name: credential.friendly_name.clone(),
            created_at: credential.created_at,
            last_used: credential.last_used,
        }
    }
}
