//! Credentials for the GraphQL backend, and how each call is authorised.
//!
//! Reads go out with the public API key, writes with the signed-in admin's id token.
use serde::{Deserialize, Serialize};

/// Information used to authorise requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: Secret,
    pub id_token: Option<Secret>,
}

/// How a single call is authorised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Anonymous access with the API key. Used for reads.
    ApiKey,

    /// The admin's user pool token. Used for writes.
    UserPool,
}

/// A key or token, wrapped so we don't print it by accident
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Secret(String);
impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret (******)")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Secret(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Secret(value.to_string())
    }
}

impl From<Secret> for String {
    fn from(val: Secret) -> Self {
        val.0
    }
}

impl AsRef<str> for Secret {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Credentials {
    /// Get the header name and value to send for the given mode.
    pub(crate) fn header(&self, mode: AuthMode) -> Option<(&'static str, &str)> {
        match mode {
            AuthMode::ApiKey => Some(("x-api-key", self.api_key.as_ref())),
            AuthMode::UserPool => self
                .id_token
                .as_ref()
                .map(|t| ("Authorization", t.as_ref())),
        }
    }
}
