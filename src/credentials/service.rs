//! Credential collaborator interface
//!
//! The dispatcher calls exactly one of these operations per request. The
//! trait is the seam between request handling and everything this service
//! deliberately does not own: the cryptographic ceremony and the credential
//! store. Implementations must be safe to share across concurrent requests.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::types::{ChallengeOptions, ChallengeRequest, CredentialSummary, StoredCredential};

/// Errors raised by a credential collaborator
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// Caller-correctable input problem; the message is safe to return
    #[error("{0}")]
    Validation(String),

    /// The credential ceremony could not be completed
    #[error("ceremony failed: {0}")]
    Ceremony(String),

    /// The referenced credential does not exist for this user
    #[error("credential not found: {0}")]
    NotFound(String),

    /// The backing store failed
    #[error("credential store error: {0}")]
    Storage(String),
}

/// Credential lifecycle operations consumed by the dispatcher
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Begin a registration ceremony by producing creation options for the
    /// client
    ///
    /// # Errors
    ///
    /// Returns an error if challenge generation fails or the request is
    /// rejected by the collaborator's own validation.
    async fn request_credentials_challenge(
        &self,
        request: ChallengeRequest,
    ) -> Result<ChallengeOptions, CredentialError>;

    /// Complete a registration ceremony from the client's credential
    /// response and persist the resulting credential
    ///
    /// # Errors
    ///
    /// Returns an error if the response does not match a pending ceremony or
    /// cannot be verified.
    async fn handle_credentials_response(
        &self,
        user_id: &str,
        response: Value,
    ) -> Result<StoredCredential, CredentialError>;

    /// List the credentials registered by a user for one relying party,
    /// ordered by creation time
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn existing_credentials_for_user(
        &self,
        user_id: &str,
        rp_id: &str,
    ) -> Result<Vec<CredentialSummary>, CredentialError>;

    /// Delete one of the user's credentials
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn delete_credential(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> Result<(), CredentialError>;

    /// Update the friendly name of one of the user's credentials
    ///
    /// # Errors
    ///
    /// Returns an error if the credential does not exist for this user or
    /// the store cannot be written.
    async fn update_credential(
        &self,
        user_id: &str,
        credential_id: &str,
        friendly_name: Option<&str>,
    ) -> Result<(), CredentialError>;
}
