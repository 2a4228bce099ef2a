//! Storage slot trait
//!
//! A slot store is a durable key-value map of JSON text. Services only talk
//! to this trait, so SQLite, in-memory maps or any future backend can sit
//! behind them.

use std::rc::Rc;

use crate::error::Result;

/// Durable key-value slots
pub trait SlotStore {
    /// Read a slot, `None` when it was never written or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a slot, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot
    fn remove(&self, key: &str) -> Result<()>;
}

// Shared handles let one backend serve several services
impl<T: SlotStore + ?Sized> SlotStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: SlotStore + ?Sized> SlotStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
