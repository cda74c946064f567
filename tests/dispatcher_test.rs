// Dispatcher behavior: routing, per-operation validation ordering, error
// classification, and exactly-one-collaborator-call discipline.

use std::sync::Arc;

use serde_json::Value;

use passgate::credentials::CredentialError;
use passgate::testing::constants::{TEST_CHALLENGE, TEST_EMAIL, TEST_NAME, TEST_RP_ID, TEST_SUB};
use passgate::testing::{sub_only_claims, EnvelopeBuilder, RecordedCall, SpyCredentialService};
use passgate::{Dispatcher, IdentityClaims, ResponseEnvelope};

fn dispatcher_with(spy: &Arc<SpyCredentialService>) -> Dispatcher {
    Dispatcher::new(vec![TEST_RP_ID.to_string()], spy.clone())
}

fn body_json(response: &ResponseEnvelope) -> Value {
    serde_json::from_str(response.body.as_deref().expect("response has a body"))
        .expect("response body is JSON")
}

fn assert_message(response: &ResponseEnvelope, status: u16, message: &str) {
    assert_eq!(response.status, status);
    assert_eq!(body_json(response)["message"], message);
}

#[tokio::test]
async fn unmatched_selector_is_always_not_found() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let envelopes = [
        EnvelopeBuilder::new("no/such/operation").build(),
        EnvelopeBuilder::new("authenticators")
            .rp_id(TEST_RP_ID)
            .query("extra", "ignored")
            .build(),
        // Claims that cannot even resolve a user handle still get a 404
        EnvelopeBuilder::new("bogus")
            .claims(IdentityClaims::default())
            .build(),
    ];
    for envelope in envelopes {
        let response = dispatcher.dispatch(&envelope).await;
        assert_message(&response, 404, "Not found");
    }
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn registration_start_requires_rp_id_before_any_call() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(&EnvelopeBuilder::new("register-authenticator/start").build())
        .await;
    assert_message(&response, 400, "Missing RP ID");
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn registration_start_rejects_unlisted_rp_id() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("register-authenticator/start")
                .rp_id("evil.example.net")
                .build(),
        )
        .await;
    assert_message(&response, 400, "Unrecognized RP ID");
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn registration_start_without_resolvable_name_is_internal() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    // Only a subject id: user handle resolves, user name does not
    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("register-authenticator/start")
                .claims(sub_only_claims())
                .rp_id(TEST_RP_ID)
                .build(),
        )
        .await;
    assert_message(&response, 500, "Internal Server Error");
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn registration_start_returns_challenge_options() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("register-authenticator/start")
                .rp_id(TEST_RP_ID)
                .build(),
        )
        .await;

    assert_eq!(response.status, 200);
    let body = body_json(&response);
    assert_eq!(body["challenge"], TEST_CHALLENGE);
    assert_eq!(body["rp"]["id"], TEST_RP_ID);
    assert_eq!(body["user"]["name"], TEST_EMAIL);
    assert_eq!(body["user"]["displayName"], TEST_NAME);

    let calls = spy.calls();
    assert_eq!(calls.len(), 1);
    let RecordedCall::Challenge(request) = &calls[0] else {
        panic!("expected a challenge call, got {calls:?}");
    };
    assert_eq!(request.user_id, TEST_SUB);
    assert_eq!(request.name, TEST_EMAIL);
    assert_eq!(request.display_name, TEST_NAME);
    assert_eq!(request.rp_id, TEST_RP_ID);
}

#[tokio::test]
async fn registration_start_is_idempotent_against_a_deterministic_fake() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);
    let envelope = EnvelopeBuilder::new("register-authenticator/start")
        .rp_id(TEST_RP_ID)
        .build();

    let first = dispatcher.dispatch(&envelope).await;
    let second = dispatcher.dispatch(&envelope).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn registration_complete_requires_a_json_object_body() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    for body in ["[1,2,3]", "\"text\"", "not json at all"] {
        let response = dispatcher
            .dispatch(
                &EnvelopeBuilder::new("register-authenticator/complete")
                    .body(body)
                    .build(),
            )
            .await;
        assert_message(&response, 500, "Internal Server Error");
    }
    // A missing body is equally internal
    let response = dispatcher
        .dispatch(&EnvelopeBuilder::new("register-authenticator/complete").build())
        .await;
    assert_message(&response, 500, "Internal Server Error");
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn registration_complete_returns_the_stored_credential() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("register-authenticator/complete")
                .body(r#"{"credentialId":"c1"}"#)
                .build(),
        )
        .await;

    assert_eq!(response.status, 200);
    let body = body_json(&response);
    assert_eq!(body["credentialId"], "c1");
    assert_eq!(body["userHandle"], TEST_SUB);
    assert_eq!(
        spy.calls(),
        vec![RecordedCall::CredentialResponse {
            user_id: TEST_SUB.to_string()
        }]
    );
}

#[tokio::test]
async fn list_requires_an_allowed_rp_id() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let missing = dispatcher
        .dispatch(&EnvelopeBuilder::new("authenticators/list").build())
        .await;
    assert_message(&missing, 400, "Missing RP ID");

    let unknown = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("authenticators/list")
                .rp_id("evil.example.net")
                .build(),
        )
        .await;
    assert_message(&unknown, 400, "Unrecognized RP ID");
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn list_wraps_summaries_in_an_authenticators_field() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("authenticators/list")
                .rp_id(TEST_RP_ID)
                .build(),
        )
        .await;

    assert_eq!(response.status, 200);
    let body = body_json(&response);
    let authenticators = body["authenticators"].as_array().unwrap();
    assert_eq!(authenticators.len(), 1);
    assert_eq!(authenticators[0]["credentialId"], "c1");
    assert_eq!(
        spy.calls(),
        vec![RecordedCall::List {
            user_id: TEST_SUB.to_string(),
            rp_id: TEST_RP_ID.to_string()
        }]
    );
}

#[tokio::test]
async fn delete_with_unparseable_body_never_reaches_the_store() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("authenticators/delete")
                .body("{{{")
                .build(),
        )
        .await;
    assert_message(&response, 500, "Internal Server Error");

    // Parseable, but missing the credential identifier
    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("authenticators/delete")
                .body(r#"{"friendlyName":"x"}"#)
                .build(),
        )
        .await;
    assert_message(&response, 500, "Internal Server Error");
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn delete_invokes_the_store_once_and_returns_bare_204() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("authenticators/delete")
                .body(r#"{"credentialId":"c1"}"#)
                .build(),
        )
        .await;

    assert_eq!(response.status, 204);
    assert!(response.body.is_none());
    assert_eq!(
        spy.calls(),
        vec![RecordedCall::Delete {
            user_id: TEST_SUB.to_string(),
            credential_id: "c1".to_string()
        }]
    );
}

#[tokio::test]
async fn update_passes_the_friendly_name_and_returns_empty_200() {
    let spy = Arc::new(SpyCredentialService::new());
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("authenticators/update")
                .body(r#"{"credentialId":"c1","friendlyName":"My laptop"}"#)
                .build(),
        )
        .await;

    assert_eq!(response.status, 200);
    assert!(response.body.is_none());
    assert_eq!(
        spy.calls(),
        vec![RecordedCall::Update {
            user_id: TEST_SUB.to_string(),
            credential_id: "c1".to_string(),
            friendly_name: Some("My laptop".to_string())
        }]
    );
}

#[tokio::test]
async fn collaborator_validation_errors_surface_as_400() {
    let spy = Arc::new(SpyCredentialService::failing_with(
        CredentialError::Validation("challenge request rejected".to_string()),
    ));
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("register-authenticator/start")
                .rp_id(TEST_RP_ID)
                .build(),
        )
        .await;
    assert_message(&response, 400, "challenge request rejected");
}

#[tokio::test]
async fn collaborator_failures_map_to_a_generic_500() {
    let spy = Arc::new(SpyCredentialService::failing_with(CredentialError::Storage(
        "table unavailable".to_string(),
    )));
    let dispatcher = dispatcher_with(&spy);

    let response = dispatcher
        .dispatch(
            &EnvelopeBuilder::new("authenticators/delete")
                .body(r#"{"credentialId":"c1"}"#)
                .build(),
        )
        .await;
    // Internal detail never leaks into the body
    assert_message(&response, 500, "Internal Server Error");
    assert_eq!(spy.call_count(), 1);
}
