//! Typed access to the named JSON slots
//!
//! Reads never fail: missing or corrupt data falls back to a default.
//! Writes are best-effort: a failed write is logged and reported as `false`,
//! and the caller's in-memory state stays authoritative.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::SlotStore;
use crate::error::Result;
use crate::models::{Account, Session};

/// Registered accounts
pub const ACCOUNTS_KEY: &str = "eshotel_users";
/// Public identity of the logged-in account
pub const SESSION_KEY: &str = "eshotel_current_user";
/// Hotel listings
pub const LISTINGS_KEY: &str = "eshotel_hotel_list";

/// One element of a stored array, either decoded or kept as it was read
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Record<'a, T> {
    Decoded(&'a T),
    Raw(&'a Value),
}

/// Decoded accounts plus stored entries that did not decode
#[derive(Debug, Default, PartialEq)]
pub struct StoredAccounts {
    pub accounts: Vec<Account>,
    pub unreadable: Vec<Value>,
}

/// Read and decode a slot; `None` if absent, unreadable or malformed
pub fn load_json<T: DeserializeOwned>(store: &impl SlotStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read slot");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed slot contents");
            None
        }
    }
}

/// Encode and write a slot, logging failures
pub fn save_json<T: Serialize + ?Sized>(store: &impl SlotStore, key: &str, value: &T) -> bool {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            warn!(key, error = %e, "Failed to encode slot");
            return false;
        }
    };

    match store.set(key, &encoded) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "Failed to persist slot");
            false
        }
    }
}

/// Remove a slot, logging failures
pub fn clear(store: &impl SlotStore, key: &str) -> bool {
    match store.remove(key) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "Failed to clear slot");
            false
        }
    }
}

/// Load the account list, self-healing to `defaults`.
///
/// When the slot is absent, unreadable, not an array or an empty array, the
/// defaults are written back and returned. Otherwise each entry is decoded
/// on its own; entries that fail are kept aside untouched and the slot is
/// left as it is. Only building the defaults can fail.
pub fn load_accounts(
    store: &impl SlotStore,
    defaults: impl FnOnce() -> Result<Vec<Account>>,
) -> Result<StoredAccounts> {
    let records = match load_json::<Value>(store, ACCOUNTS_KEY) {
        Some(Value::Array(records)) if !records.is_empty() => records,
        _ => {
            let accounts = defaults()?;
            debug!(count = accounts.len(), "Seeding default accounts");
            save_json(store, ACCOUNTS_KEY, &accounts);
            return Ok(StoredAccounts {
                accounts,
                unreadable: Vec::new(),
            });
        }
    };

    let mut stored = StoredAccounts::default();
    for (index, record) in records.into_iter().enumerate() {
        match Account::deserialize(&record) {
            Ok(account) => stored.accounts.push(account),
            Err(e) => {
                warn!(index, error = %e, "Keeping undecodable account record");
                stored.unreadable.push(record);
            }
        }
    }
    Ok(stored)
}

/// Write the accounts followed by any entries that did not decode
pub fn save_accounts(store: &impl SlotStore, accounts: &[Account], unreadable: &[Value]) -> bool {
    let records: Vec<Record<'_, Account>> = accounts
        .iter()
        .map(Record::Decoded)
        .chain(unreadable.iter().map(Record::Raw))
        .collect();
    save_json(store, ACCOUNTS_KEY, &records)
}

pub fn load_session(store: &impl SlotStore) -> Option<Session> {
    load_json(store, SESSION_KEY)
}

/// Persist the current session, removing the slot when there is none
pub fn save_session(store: &impl SlotStore, session: Option<&Session>) -> bool {
    match session {
        Some(session) => save_json(store, SESSION_KEY, session),
        None => clear(store, SESSION_KEY),
    }
}

/// Load the raw listing records.
///
/// Anything other than a JSON array yields an empty list.
pub fn load_listing_records(store: &impl SlotStore) -> Vec<Value> {
    match load_json::<Value>(store, LISTINGS_KEY) {
        Some(Value::Array(records)) => records,
        Some(_) => {
            warn!(key = LISTINGS_KEY, "Listing slot is not an array, starting empty");
            Vec::new()
        }
        None => Vec::new(),
    }
}

pub fn save_listings<T: Serialize>(store: &impl SlotStore, listings: &[T]) -> bool {
    save_json(store, LISTINGS_KEY, listings)
}
