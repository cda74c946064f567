//! In-memory credential collaborator
//!
//! Backs the service for local runs and tests. Production deployments swap
//! this for a real store behind the same [`CredentialService`] trait; the
//! dispatcher cannot tell the difference. Registration here is a bookkeeping
//! ceremony only: the attestation payload is recorded, not cryptographically
//! verified.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use rand::RngCore;
use serde_json::Value;
use tokio::sync::RwLock;

use super::service::{CredentialError, CredentialService};
use super::types::{
    AuthenticatorSelectionCriteria, ChallengeOptions, ChallengeRequest, CredentialSummary,
    PublicKeyCredentialParameters, RelyingParty, StoredCredential, UserEntity,
};

const CHALLENGE_BYTES: usize = 32;
const TIMEOUT_MS: u32 = 60_000;

/// A registration ceremony started but not yet completed, keyed by user
/// handle
#[derive(Debug, Clone)]
struct PendingRegistration {
    challenge: String,
    rp_id: String,
}

#[derive(Default)]
struct StoreState {
    pending: HashMap<String, PendingRegistration>,
    credentials: Vec<StoredCredential>,
}

/// In-memory implementation of [`CredentialService`]
#[derive(Default)]
pub struct MemoryCredentialStore {
    state: RwLock<StoreState>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_challenge() -> String {
        let mut bytes = [0u8; CHALLENGE_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[async_trait]
impl CredentialService for MemoryCredentialStore {
    async fn request_credentials_challenge(
        &self,
        request: ChallengeRequest,
    ) -> Result<ChallengeOptions, CredentialError> {
        let challenge = Self::generate_challenge();
        let options = ChallengeOptions {
            challenge: challenge.clone(),
            rp: RelyingParty {
                id: request.rp_id.clone(),
                name: request.rp_id.clone(),
            },
            user: UserEntity {
                id: URL_SAFE_NO_PAD.encode(request.user_id.as_bytes()),
                name: request.name,
                display_name: request.display_name,
            },
            pub_key_cred_params: vec![
                PublicKeyCredentialParameters {
                    r#type: "public-key".into(),
                    alg: -7, // ES256
                },
                PublicKeyCredentialParameters {
                    r#type: "public-key".into(),
                    alg: -257, // RS256
                },
            ],
            timeout: TIMEOUT_MS,
            attestation: "none".into(),
            authenticator_selection: AuthenticatorSelectionCriteria {
                authenticator_attachment: None,
                require_resident_key: false,
                user_verification: "preferred".into(),
            },
        };

        // A new start supersedes any earlier unfinished ceremony for the
        // same user.
        let mut state = self.state.write().await;
        state.pending.insert(
            request.user_id,
            PendingRegistration {
                challenge,
                rp_id: request.rp_id,
            },
        );
        Ok(options)
    }

    async fn handle_credentials_response(
        &self,
        user_id: &str,
        response: Value,
    ) -> Result<StoredCredential, CredentialError> {
        let mut state = self.state.write().await;
        let pending = state
            .pending
            .remove(user_id)
            .ok_or_else(|| CredentialError::Ceremony(format!("no pending registration for {user_id}")))?;

        let credential_id = response
            .get("credentialId")
            .and_then(Value::as_str)
            .ok_or_else(|| CredentialError::Ceremony("credential response is missing credentialId".into()))?
            .to_string();

        if state
            .credentials
            .iter()
            .any(|c| c.credential_id == credential_id)
        {
            return Err(CredentialError::Storage(format!(
                "credential {credential_id} already registered"
            )));
        }

        let friendly_name = response
            .get("friendlyName")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        log::debug!(
            "storing credential {credential_id} for user {user_id} (challenge {})",
            pending.challenge
        );

        let credential = StoredCredential {
            credential_id,
            user_handle: user_id.to_string(),
            rp_id: pending.rp_id,
            friendly_name,
            created_at: Utc::now(),
            last_used: None,
        };
        state.credentials.push(credential.clone());
        Ok(credential)
    }

    async fn existing_credentials_for_user(
        &self,
        user_id: &str,
        rp_id: &str,
    ) -> Result<Vec<CredentialSummary>, CredentialError> {
        let state = self.state.read().await;
        let mut matching: Vec<&StoredCredential> = state
            .credentials
            .iter()
            .filter(|c| c.user_handle == user_id && c.rp_id == rp_id)
            .collect();
        matching.sort_by_key(|c| c.created_at);
        Ok(matching.into_iter().map(CredentialSummary::from).collect())
    }

    async fn delete_credential(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> Result<(), CredentialError> {
        // Deleting an unknown credential is a no-op; delete is idempotent.
        let mut state = self.state.write().await;
        state
            .credentials
            .retain(|c| !(c.user_handle == user_id && c.credential_id == credential_id));
        Ok(())
    }

    async fn update_credential(
        &self,
        user_id: &str,
        credential_id: &str,
        friendly_name: Option<&str>,
    ) -> Result<(), CredentialError> {
        let mut state = self.state.write().await;
        let credential = state
            .credentials
            .iter_mut()
            .find(|c| c.user_handle == user_id && c.credential_id == credential_id)
            .ok_or_else(|| CredentialError::NotFound(credential_id.to_string()))?;
        credential.friendly_name = friendly_name.map(ToString::to_string);
        Ok(())
    }
}
