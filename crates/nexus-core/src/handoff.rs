//! Transient issuance → display handoff
//!
//! A single-value slot passing one freshly minted record from the
//! issuance flow to the display flow. Read-once: [`Handoff::take`]
//! clears the slot before returning. Absent or unreadable contents
//! yield `None`, and the display flow falls back to the dashboard.

use crate::record::KeyRecord;
use crate::store::StorageSlot;
use crate::Result;

/// One-shot handoff slot
pub struct Handoff {
    slot: Box<dyn StorageSlot>,
}

impl Handoff {
    /// Create a handoff over the given slot
    ///
    /// The slot should be session-scoped and distinct from the durable
    /// key store.
    pub fn new(slot: Box<dyn StorageSlot>) -> Self {
        Self { slot }
    }

    /// Park a freshly minted record for the display flow
    pub fn put(&self, record: &KeyRecord) -> Result<()> {
        self.slot.write(&serde_json::to_string(record)?)
    }

    /// Take the pending record, clearing the slot
    ///
    /// `None` when the slot is empty or its contents don't parse; the
    /// slot is cleared either way.
    pub fn take(&self) -> Result<Option<KeyRecord>> {
        let contents = match self.slot.read() {
            Some(contents) => contents,
            None => return Ok(None),
        };
        self.slot.clear()?;
        Ok(serde_json::from_str(&contents).ok())
    }
}
