//! Account store
//!
//! Registered accounts plus the single current session. This is the only
//! writer of the accounts and session slots.

pub mod credentials;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{Account, Role, Session};
use crate::storage::slots;
use crate::storage::SlotStore;

pub use credentials::{Argon2Scheme, CredentialScheme, PasswordScheme, Plaintext};

/// Accounts seeded when the accounts slot is missing or empty
pub const DEFAULT_ACCOUNTS: [(&str, &str, Role); 2] = [
    ("1234", "1234", Role::Merchant),
    ("admin", "1234", Role::Admin),
];

pub struct AccountStore<S: SlotStore> {
    store: S,
    scheme: Box<dyn CredentialScheme>,
    accounts: Vec<Account>,
    /// Stored account entries that could not be decoded, written back untouched
    unreadable: Vec<Value>,
    current: Option<Session>,
}

impl<S: SlotStore> AccountStore<S> {
    /// Load accounts and session using plaintext credentials
    pub fn load(store: S) -> Result<Self> {
        Self::with_scheme(store, Box::new(Plaintext))
    }

    /// Load accounts and session, sealing any seeded defaults with `scheme`
    #[instrument(skip_all)]
    pub fn with_scheme(store: S, scheme: Box<dyn CredentialScheme>) -> Result<Self> {
        let stored = slots::load_accounts(&store, || {
            DEFAULT_ACCOUNTS
                .iter()
                .map(|(username, password, role)| -> Result<Account> {
                    Ok(Account::new(*username, scheme.seal(password)?, *role))
                })
                .collect()
        })?;
        let current = slots::load_session(&store);

        info!(
            accounts = stored.accounts.len(),
            unreadable = stored.unreadable.len(),
            session = current.as_ref().map(|s| s.username.as_str()),
            "Loaded accounts"
        );
        Ok(Self {
            store,
            scheme,
            accounts: stored.accounts,
            unreadable: stored.unreadable,
            current,
        })
    }

    /// Authenticate and make the account the current session.
    ///
    /// Usernames match case-insensitively; passwords are checked by the
    /// credential scheme.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.matches_username(username) && self.scheme.verify(&a.password, password))
            .ok_or_else(|| {
                debug!("Login rejected");
                Error::InvalidCredentials
            })?;

        let session = account.session();
        if !slots::save_session(&self.store, Some(&session)) {
            warn!("Session not persisted, continuing in memory");
        }
        info!(username = %session.username, role = %session.role, "Logged in");
        self.current = Some(session.clone());
        Ok(session)
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            info!(username = %session.username, "Logged out");
        }
        slots::save_session(&self.store, None);
    }

    /// Register a new account. Does not log in.
    ///
    /// Unknown role tags register a merchant.
    #[instrument(skip(self, password))]
    pub fn register(&mut self, username: &str, password: &str, role: &str) -> Result<()> {
        if self.accounts.iter().any(|a| a.matches_username(username)) {
            return Err(Error::UsernameExists(username.to_string()));
        }

        let account = Account::new(username, self.scheme.seal(password)?, Role::normalize(role));
        info!(username, role = %account.role, "Registered account");
        self.accounts.push(account);
        slots::save_accounts(&self.store, &self.accounts, &self.unreadable);
        Ok(())
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.current.as_ref().is_some_and(Session::is_admin)
    }

    pub fn is_merchant(&self) -> bool {
        self.current.as_ref().is_some_and(Session::is_merchant)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}
