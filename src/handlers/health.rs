//! Health check handler

use actix_web::HttpResponse;
use serde_json::json;

/// Liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
