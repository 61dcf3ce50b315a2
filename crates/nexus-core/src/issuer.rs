//! Gate-checked key issuance
//!
//! Ties the flow together: once the gate reports every step Completed,
//! a record is minted, persisted, and parked in the handoff slot for
//! the display flow.

use crate::codec::KeyCodec;
use crate::gate::VerificationGate;
use crate::handoff::Handoff;
use crate::record::KeyRecord;
use crate::store::KeyStore;
use crate::Result;

/// Issues keys once the verification gate is fully walked
pub struct KeyIssuer {
    codec: KeyCodec,
    store: KeyStore,
    handoff: Handoff,
}

impl KeyIssuer {
    pub fn new(codec: KeyCodec, store: KeyStore, handoff: Handoff) -> Self {
        Self {
            codec,
            store,
            handoff,
        }
    }

    /// Mint, persist, and hand off one record
    ///
    /// `Ok(None)` when the gate is not fully completed: premature issue
    /// attempts are ignored, not errors.
    pub fn issue(&self, gate: &VerificationGate) -> Result<Option<KeyRecord>> {
        if !gate.issuance_enabled() {
            return Ok(None);
        }

        let record = self.codec.generate();
        self.store.append(record.clone())?;
        self.handoff.put(&record)?;
        Ok(Some(record))
    }

    /// The durable store backing this issuer
    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    /// The handoff slot backing this issuer
    pub fn handoff(&self) -> &Handoff {
        &self.handoff
    }
}
