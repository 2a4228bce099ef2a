//! Credential schemes
//!
//! A scheme decides what is stored in an account's password field and how a
//! login attempt is checked against it.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Seals passwords for storage and verifies login attempts
pub trait CredentialScheme {
    /// Value to store for a newly chosen password
    fn seal(&self, password: &str) -> Result<String>;

    /// Whether `candidate` matches the stored value
    fn verify(&self, stored: &str, candidate: &str) -> bool;
}

/// Stores passwords as given and compares them exactly
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl CredentialScheme for Plaintext {
    fn seal(&self, password: &str) -> Result<String> {
        Ok(password.to_string())
    }

    fn verify(&self, stored: &str, candidate: &str) -> bool {
        stored == candidate
    }
}

/// Stores salted argon2 hashes in PHC format
///
/// Stored values that are not PHC strings were written by the plaintext
/// scheme and are compared exactly.
#[derive(Default)]
pub struct Argon2Scheme {
    argon2: Argon2<'static>,
}

impl Argon2Scheme {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialScheme for Argon2Scheme {
    fn seal(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, stored: &str, candidate: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon2
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => stored == candidate,
        }
    }
}

/// Configurable choice of credential scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    #[default]
    Plaintext,
    Argon2,
}

impl PasswordScheme {
    pub fn build(self) -> Box<dyn CredentialScheme> {
        match self {
            PasswordScheme::Plaintext => Box::new(Plaintext),
            PasswordScheme::Argon2 => Box::new(Argon2Scheme::new()),
        }
    }
}
