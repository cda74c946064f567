//! HTTP handlers
//!
//! Thin adapters between actix-web and the dispatcher core.

mod fido2;
mod health;

pub use fido2::fido2_route;
pub use health::health;

use actix_web::web;

/// Register all service routes
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg
        // Credential API; the tail selects the operation
        .route("/fido2/{fido2path:.*}", web::get().to(fido2_route))
        .route("/fido2/{fido2path:.*}", web::post().to(fido2_route))
        // Health endpoint
        .route("/ping", web::get().to(health));
}
