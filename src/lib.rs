#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the passgate application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod claims;
pub mod credentials;
pub mod error;
pub mod fido2;
pub mod handlers;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use claims::{IdentityClaims, ResolvedIdentity};
pub use credentials::{CredentialService, MemoryCredentialStore};
pub use error::GatewayError;
pub use fido2::{Dispatcher, Fido2Path, RequestEnvelope, ResponseEnvelope};
pub use settings::PassgateSettings;
