//! Credential collaborator boundary
//!
//! Defines the trait the dispatcher calls for credential lifecycle
//! operations, the wire types exchanged over it, and an in-memory
//! implementation for local runs and tests.

mod memory;
mod service;
mod types;

pub use memory::MemoryCredentialStore;
pub use service::{CredentialError, CredentialService};
pub use types::{
    AuthenticatorSelectionCriteria, ChallengeOptions, ChallengeRequest, CredentialSummary,
    PublicKeyCredentialParameters, RelyingParty, StoredCredential, UserEntity,
};
