//! eshotel Core Library
//!
//! Models, slot storage, accounts, and the listing lifecycle for the
//! eshotel hotel-listing desk.

pub mod accounts;
pub mod clock;
pub mod config;
pub mod error;
pub mod invariants;
pub mod listings;
pub mod models;
pub mod permissions;
pub mod storage;

pub use accounts::{AccountStore, Argon2Scheme, CredentialScheme, PasswordScheme, Plaintext};
pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use listings::ListingEngine;
pub use models::*;
pub use permissions::*;
pub use storage::{Database, MemorySlots, SlotStore};
