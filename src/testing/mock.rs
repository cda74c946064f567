//! Spy credential collaborator
//!
//! Records every invocation and returns deterministic responses, so tests
//! can assert both what the dispatcher returned and which collaborator calls
//! it made (including that validation failures made none).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::credentials::{
    AuthenticatorSelectionCriteria, ChallengeOptions, ChallengeRequest, CredentialError,
    CredentialService, CredentialSummary, PublicKeyCredentialParameters, RelyingParty,
    StoredCredential, UserEntity,
};

use super::constants::TEST_CHALLENGE;

/// One recorded collaborator invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Challenge(ChallengeRequest),
    CredentialResponse {
        user_id: String,
    },
    List {
        user_id: String,
        rp_id: String,
    },
    Delete {
        user_id: String,
        credential_id: String,
    },
    Update {
        user_id: String,
        credential_id: String,
        friendly_name: Option<String>,
    },
}

/// Deterministic [`CredentialService`] that records its calls
#[derive(Default)]
pub struct SpyCredentialService {
    calls: Mutex<Vec<RecordedCall>>,
    failure: Option<CredentialError>,
}

impl SpyCredentialService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A spy whose every operation fails with the given error
    #[must_use]
    pub fn failing_with(failure: CredentialError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(failure),
        }
    }

    /// All calls recorded so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("spy lock poisoned").clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn record(&self, call: RecordedCall) -> Result<(), CredentialError> {
        self.calls.lock().expect("spy lock poisoned").push(call);
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    /// The fixed credential record the spy stores and lists
    #[must_use]
    pub fn stored_credential(user_id: &str) -> StoredCredential {
        StoredCredential {
            credential_id: "c1".to_string(),
            user_handle: user_id.to_string(),
            rp_id: "example.com".to_string(),
            friendly_name: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            last_used: None,
        }
    }
}

#[async_trait]
impl CredentialService for SpyCredentialService {
    async fn request_credentials_challenge(
        &self,
        request: ChallengeRequest,
    ) -> Result<ChallengeOptions, CredentialError> {
        let options = ChallengeOptions {
            challenge: TEST_CHALLENGE.to_string(),
            rp: RelyingParty {
                id: request.rp_id.clone(),
                name: request.rp_id.clone(),
            },
            user: UserEntity {
                id: request.user_id.clone(),
                name: request.name.clone(),
                display_name: request.display_name.clone(),
            },
            pub_key_cred_params: vec![PublicKeyCredentialParameters {
                r#type: "public-key".into(),
                alg: -7,
            }],
            timeout: 60_000,
            attestation: "none".into(),
            authenticator_selection: AuthenticatorSelectionCriteria {
                authenticator_attachment: None,
                require_resident_key: false,
                user_verification: "preferred".into(),
            },
        };
        self.record(RecordedCall::Challenge(request))?;
        Ok(options)
    }

    async fn handle_credentials_response(
        &self,
        user_id: &str,
        _response: Value,
    ) -> Result<StoredCredential, CredentialError> {
        self.record(RecordedCall::CredentialResponse {
            user_id: user_id.to_string(),
        })?;
        Ok(Self::stored_credential(user_id))
    }

    async fn existing_credentials_for_user(
        &self,
        user_id: &str,
        rp_id: &str,
    ) -> Result<Vec<CredentialSummary>, CredentialError> {
        self.record(RecordedCall::List {
            user_id: user_id.to_string(),
            rp_id: rp_id.to_string(),
        })?;
        Ok(vec![CredentialSummary::from(&Self::stored_credential(
            user_id,
        ))])
    }

    async fn delete_credential(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> Result<(), CredentialError> {
        self.record(RecordedCall::Delete {
            user_id: user_id.to_string(),
            credential_id: credential_id.to_string(),
        })
    }

    async fn update_credential(
        &self,
        user_id: &str,
        credential_id: &str,
        friendly_name: Option<&str>,
    ) -> Result<(), CredentialError> {
        self.record(RecordedCall::Update {
            user_id: user_id.to_string(),
            credential_id: credential_id.to_string(),
            friendly_name: friendly_name.map(ToString::to_string),
        })
    }
}
