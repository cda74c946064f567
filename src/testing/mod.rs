//! Testing utilities
//!
//! Fixtures, envelope builders, and a spy credential collaborator shared by
//! unit and integration tests. Compiled only for tests or with the
//! `testing` feature enabled.

pub mod fixtures;
pub mod mock;

pub use fixtures::{bearer_token, full_claims, sub_only_claims, EnvelopeBuilder};
pub use mock::{RecordedCall, SpyCredentialService};

/// Common test constants
pub mod constants {
    /// Default test subject id
    pub const TEST_SUB: &str = "u1";

    /// Default test email address
    pub const TEST_EMAIL: &str = "a@b.com";

    /// Default test display name
    pub const TEST_NAME: &str = "A";

    /// Default test provider username
    pub const TEST_USERNAME: &str = "alice";

    /// Relying-party id present in test allow-lists
    pub const TEST_RP_ID: &str = "example.com";

    /// Fixed challenge returned by the spy collaborator
    pub const TEST_CHALLENGE: &str = "dGVzdC1jaGFsbGVuZ2UtMDE";
}
