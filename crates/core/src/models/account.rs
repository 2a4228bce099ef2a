//! Account and session models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role tag attached to every account
///
/// Records stored without a role are merchants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    #[default]
    Merchant,
}

impl Role {
    /// Normalize a role tag. Anything other than `admin` is a merchant.
    pub fn normalize(tag: &str) -> Self {
        if tag == "admin" {
            Role::Admin
        } else {
            Role::Merchant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Merchant => "merchant",
        }
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Role::normalize(&tag)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account
///
/// `password` holds whatever the active credential scheme sealed: the raw
/// password for the plaintext scheme, a PHC string for argon2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    /// Case-insensitive username comparison
    pub fn matches_username(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase()
    }

    /// Public identity of this account, without the password
    pub fn session(&self) -> Session {
        Session {
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// The logged-in account's public identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_merchant(&self) -> bool {
        self.role == Role::Merchant
    }
}
