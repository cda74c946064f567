#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use passgate::{
    handlers::configure_services, Dispatcher, MemoryCredentialStore, PassgateSettings,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables; this
    // also initializes the logger
    let settings = PassgateSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let store = Arc::new(MemoryCredentialStore::new());
    let dispatcher = Dispatcher::new(settings.relying_party.allowed_rp_ids.clone(), store);

    start_server(dispatcher, settings).await
}

/// Start the server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(dispatcher: Dispatcher, settings: PassgateSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    log::info!(
        "passgate {} listening on {bind_address} (allowed RP ids: {:?})",
        passgate::VERSION,
        settings.relying_party.allowed_rp_ids
    );

    // Configure CORS for SPAs
    let cors_origins = settings.get_cors_origins();
    let dispatcher = web::Data::new(dispatcher);

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(dispatcher.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}
