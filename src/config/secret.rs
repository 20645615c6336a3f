//! Credential wrapper for the Grafana token and basic-auth password
//!
//! Both live in memory as `Secret<SecretValue>`: zeroed on drop, redacted
//! in Debug output, readable only through `expose_secret()` where the
//! `Authorization` header is built.
//!
//! ```rust
//! use grafex::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let api_key = secret_string("glsa_abc".to_string());
//! assert_eq!(api_key.expose_secret().to_string(), "glsa_abc");
//! assert!(!format!("{api_key:?}").contains("glsa_abc"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Token or password text, as read from the config file or environment
#[derive(Clone, Zeroize, Serialize, Deserialize)]
#[zeroize(drop)]
#[serde(transparent)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    /// Empty or whitespace-only credentials count as missing
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([REDACTED])")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type SecretString = Secret<SecretValue>;

pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}
