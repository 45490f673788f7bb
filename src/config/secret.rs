//! Secure credential handling using the secrecy crate
//!
//! The upstream API password is held in memory as a `Secret` so it is zeroed
//! on drop and redacted in Debug output. Access requires an explicit
//! `expose_secret()` call at the single point where the auth header is built.

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Helper function to create a SecretString from a String
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Helper function to create an optional SecretString from an optional String
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(|s| Secret::new(SecretValue::from(s)))
}
