//! FIDO2 route adapter
//!
//! Translates actix requests into [`RequestEnvelope`]s and dispatcher
//! responses back into HTTP. No operation logic lives here; a request that
//! carries valid claims always reaches the dispatcher.

use std::collections::HashMap;

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::claims::IdentityClaims;
use crate::fido2::{Dispatcher, Fido2Path, RequestEnvelope, ResponseEnvelope};

/// Handle any request under `/fido2/`
pub async fn fido2_route(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    dispatcher: web::Data<Dispatcher>,
) -> HttpResponse {
    let claims = match bearer_claims(&req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    let body = if body.is_empty() {
        None
    } else {
        // A JSON body must be UTF-8; anything else is a malformed body and
        // takes the internal-error path like any other unparseable payload
        match String::from_utf8(body.to_vec()) {
            Ok(body) => Some(body),
            Err(e) => {
                log::error!("{} request body is not valid UTF-8: {e}", path.as_str());
                return to_http_response(ResponseEnvelope::internal_error());
            }
        }
    };

    let envelope = RequestEnvelope {
        path: Fido2Path::parse(&path),
        query,
        body,
        claims,
    };
    to_http_response(dispatcher.dispatch(&envelope).await)
}

/// Extract claims from the bearer token the upstream authorizer attached
///
/// The authorizer has already verified the token; requests without one never
/// legitimately reach this service and are refused outright.
fn bearer_claims(req: &HttpRequest) -> Result<IdentityClaims, HttpResponse> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(unauthorized());
    };

    IdentityClaims::from_bearer(token).map_err(|e| {
        log::warn!("rejecting request with undecodable bearer token: {e}");
        unauthorized()
    })
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({ "message": "Unauthorized" }))
}

fn to_http_response(envelope: ResponseEnvelope) -> HttpResponse {
    let status =
        StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);
    for (name, value) in envelope.headers {
        builder.insert_header((*name, *value));
    }
    match envelope.body {
        Some(body) => builder.body(body),
        None => builder.finish(),
    }
}
