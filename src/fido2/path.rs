//! Operation selectors

use std::fmt;

/// The closed set of credential API operations
///
/// Selectors are matched exactly; anything else is [`Fido2Path::Unknown`],
/// which the dispatcher resolves to 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fido2Path {
    RegisterAuthenticatorStart,
    RegisterAuthenticatorComplete,
    AuthenticatorsList,
    AuthenticatorsDelete,
    AuthenticatorsUpdate,
    Unknown,
}

impl Fido2Path {
    /// Parse a path selector string
    #[must_use]
    pub fn parse(selector: &str) -> Self {
        match selector {
            "register-authenticator/start" => Self::RegisterAuthenticatorStart,
            "register-authenticator/complete" => Self::RegisterAuthenticatorComplete,
            "authenticators/list" => Self::AuthenticatorsList,
            "authenticators/delete" => Self::AuthenticatorsDelete,
            "authenticators/update" => Self::AuthenticatorsUpdate,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Fido2Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RegisterAuthenticatorStart => "register-authenticator/start",
            Self::RegisterAuthenticatorComplete => "register-authenticator/complete",
            Self::AuthenticatorsList => "authenticators/list",
            Self::AuthenticatorsDelete => "authenticators/delete",
            Self::AuthenticatorsUpdate => "authenticators/update",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
