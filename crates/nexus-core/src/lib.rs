//! # Nexus Core
//!
//! Expiring access-key lifecycle behind a step-gated issuance flow.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      ISSUANCE FLOW                           │
//! │                                                              │
//! │  VerificationGate ──all steps──► KeyIssuer                   │
//! │   (Locked → Unlocked →            │                          │
//! │    Verifying → Completed)         ├──► KeyCodec (mint)       │
//! │                                   ├──► KeyStore (persist)    │
//! │                                   └──► Handoff  (one-shot)   │
//! │                                              │               │
//! │                      DISPLAY FLOW ◄──take────┘               │
//! │                       (KeyCard rendering via present)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keys live for a fixed 15 hours. The store evicts expired records
//! lazily on every read, so consumers never observe a stale entry.
//! All current-time reads go through the [`Clock`] trait, which keeps
//! expiration and gate logic deterministic under test.

pub mod clock;
pub mod codec;
pub mod gate;
pub mod handoff;
pub mod issuer;
pub mod present;
pub mod record;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::KeyCodec;
pub use gate::{GateEvent, ScheduledVerify, StepStatus, VerificationGate, VERIFY_DELAY};
pub use handoff::Handoff;
pub use issuer::KeyIssuer;
pub use present::{format_date, format_time_remaining, KeyCard};
pub use record::{KeyRecord, KEY_TTL_HOURS};
pub use store::{FileSlot, KeyStore, MemorySlot, StorageSlot};

/// Result type for nexus-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in nexus-core
///
/// Malformed persisted data is deliberately NOT represented here: the
/// store treats it as an empty collection. Only real storage failures
/// (unwritable file, full disk) surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
