//! Operation dispatcher
//!
//! Routes one authenticated event to one credential lifecycle operation.
//! Each operation validates its own inputs in order (cheapest first, so a
//! malformed request never reaches the collaborator), makes exactly one
//! collaborator call, and assembles the response. All failures propagate to
//! a single mapper that classifies them as user-facing (400 with message) or
//! internal (500, detail logged only).

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::claims::ResolvedIdentity;
use crate::credentials::{ChallengeRequest, CredentialService};
use crate::error::GatewayError;
use crate::fido2::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::fido2::path::Fido2Path;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest {
    credential_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest {
    credential_id: String,
    friendly_name: Option<String>,
}

/// Stateless request dispatcher
///
/// Holds only read-only configuration and the collaborator handle; every
/// request is independent, so concurrent dispatches need no coordination.
pub struct Dispatcher {
    allowed_rp_ids: Vec<String>,
    service: Arc<dyn CredentialService>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(allowed_rp_ids: Vec<String>, service: Arc<dyn CredentialService>) -> Self {
        Self {
            allowed_rp_ids,
            service,
        }
    }

    /// Handle one event, always producing exactly one response
    pub async fn dispatch(&self, event: &RequestEnvelope) -> ResponseEnvelope {
        match self.route(event).await {
            Ok(response) => response,
            Err(GatewayError::UserFacing(message)) => {
                log::warn!("rejecting {} request: {message}", event.path);
                ResponseEnvelope::message(400, &message)
            }
            Err(GatewayError::Internal(source)) => {
                log::error!("{} request failed: {source:#}", event.path);
                ResponseEnvelope::internal_error()
            }
        }
    }

    async fn route(&self, event: &RequestEnvelope) -> Result<ResponseEnvelope, GatewayError> {
        // An unmatched selector is 404 before anything else; claims and
        // query content never change that outcome.
        if event.path == Fido2Path::Unknown {
            return Ok(ResponseEnvelope::not_found());
        }
        let identity = ResolvedIdentity::from_claims(&event.claims)?;
        match event.path {
            Fido2Path::RegisterAuthenticatorStart => {
                self.start_registration(event, &identity).await
            }
            Fido2Path::RegisterAuthenticatorComplete => {
                self.complete_registration(event, &identity).await
            }
            Fido2Path::AuthenticatorsList => self.list_authenticators(event, &identity).await,
            Fido2Path::AuthenticatorsDelete => self.delete_authenticator(event, &identity).await,
            Fido2Path::AuthenticatorsUpdate => self.update_authenticator(event, &identity).await,
            Fido2Path::Unknown => Ok(ResponseEnvelope::not_found()),
        }
    }

    async fn start_registration(
        &self,
        event: &RequestEnvelope,
        identity: &ResolvedIdentity,
    ) -> Result<ResponseEnvelope, GatewayError> {
        log::info!("starting a new authenticator registration");
        let user_name = identity
            .user_name
            .as_deref()
            .ok_or_else(|| GatewayError::internal("unable to determine name for user"))?;
        let display_name = identity
            .display_name
            .as_deref()
            .ok_or_else(|| GatewayError::internal("unable to determine display name for user"))?;
        let rp_id = self.require_allowed_rp_id(event)?;

        let options = self
            .service
            .request_credentials_challenge(ChallengeRequest {
                user_id: identity.user_handle.clone(),
                name: user_name.to_string(),
                display_name: display_name.to_string(),
                rp_id: rp_id.to_string(),
            })
            .await?;
        log::debug!("challenge options: {options:?}");
        ResponseEnvelope::json(200, &options)
    }

    async fn complete_registration(
        &self,
        event: &RequestEnvelope,
        identity: &ResolvedIdentity,
    ) -> Result<ResponseEnvelope, GatewayError> {
        log::info!("completing the new authenticator registration");
        let body = parse_body(event)?;
        assert_body_is_object(&body)?;
        let stored = self
            .service
            .handle_credentials_response(&identity.user_handle, body)
            .await?;
        ResponseEnvelope::json(200, &stored)
    }

    async fn list_authenticators(
        &self,
        event: &RequestEnvelope,
        identity: &ResolvedIdentity,
    ) -> Result<ResponseEnvelope, GatewayError> {
        log::info!("listing authenticators");
        let rp_id = self.require_allowed_rp_id(event)?;
        let authenticators = self
            .service
            .existing_credentials_for_user(&identity.user_handle, rp_id)
            .await?;
        ResponseEnvelope::json(200, &json!({ "authenticators": authenticators }))
    }

    async fn delete_authenticator(
        &self,
        event: &RequestEnvelope,
        identity: &ResolvedIdentity,
    ) -> Result<ResponseEnvelope, GatewayError> {
        log::info!("deleting authenticator");
        let body = parse_body(event)?;
        assert_body_is_object(&body)?;
        let request: DeleteRequest = from_body(body)?;
        log::debug!("credential id: {}", request.credential_id);
        self.service
            .delete_credential(&identity.user_handle, &request.credential_id)
            .await?;
        Ok(ResponseEnvelope::status_only(204))
    }

    async fn update_authenticator(
        &self,
        event: &RequestEnvelope,
        identity: &ResolvedIdentity,
    ) -> Result<ResponseEnvelope, GatewayError> {
        let body = parse_body(event)?;
        assert_body_is_object(&body)?;
        let request: UpdateRequest = from_body(body)?;
        self.service
            .update_credential(
                &identity.user_handle,
                &request.credential_id,
                request.friendly_name.as_deref(),
            )
            .await?;
        Ok(ResponseEnvelope::status_only(200))
    }

    /// Require the `rpId` query parameter and check it against the
    /// configured allow-list. Absence and non-membership are distinct,
    /// user-facing errors.
    fn require_allowed_rp_id<'a>(
        &self,
        event: &'a RequestEnvelope,
    ) -> Result<&'a str, GatewayError> {
        let rp_id = event
            .rp_id()
            .ok_or_else(|| GatewayError::user_facing("Missing RP ID"))?;
        if !self.allowed_rp_ids.iter().any(|allowed| allowed == rp_id) {
            return Err(GatewayError::user_facing("Unrecognized RP ID"));
        }
        Ok(rp_id)
    }
}

fn parse_body(event: &RequestEnvelope) -> Result<Value, GatewayError> {
    let raw = event
        .body
        .as_deref()
        .ok_or_else(|| GatewayError::internal("request body is missing"))?;
    serde_json::from_str(raw)
        .map_err(|e| GatewayError::internal(format!("request body is not valid JSON: {e}")))
}

fn assert_body_is_object(value: &Value) -> Result<&Map<String, Value>, GatewayError> {
    value
        .as_object()
        .ok_or_else(|| GatewayError::internal("request body is not a JSON object"))
}

fn from_body<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::internal(format!("request body has unexpected shape: {e}")))
}
