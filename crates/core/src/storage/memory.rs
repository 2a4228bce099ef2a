//! In-memory slot store

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::traits::SlotStore;
use crate::error::{Error, Result};

/// Slot store kept entirely in memory
///
/// Writes can be switched off to simulate a full or read-only backend.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: RefCell<HashMap<String, String>>,
    reject_writes: Cell<bool>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, bypassing the write switch
    pub fn with_slot(self, key: &str, value: &str) -> Self {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Make every subsequent `set`/`remove` fail
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Raw slot contents
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    fn check_writable(&self) -> Result<()> {
        if self.reject_writes.get() {
            return Err(Error::Storage("slot store rejected the write".into()));
        }
        Ok(())
    }
}

impl SlotStore for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
