//! Key code generation

use crate::clock::Clock;
use crate::record::KeyRecord;
use rand::Rng;
use std::sync::Arc;

/// Alphabet codes are drawn from
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Mints key records: random formatted code + timestamps from the
/// injected clock
pub struct KeyCodec {
    clock: Arc<dyn Clock>,
}

impl KeyCodec {
    /// Create a codec reading time from the given clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Mint a fresh record: `KEY-` plus three hyphen-separated groups
    /// of four characters drawn uniformly from `A-Z0-9`
    pub fn generate(&self) -> KeyRecord {
        let mut rng = rand::thread_rng();
        let mut key = String::from("KEY");

        for _ in 0..3 {
            key.push('-');
            for _ in 0..4 {
                let idx = rng.gen_range(0..CODE_ALPHABET.len());
                key.push(CODE_ALPHABET[idx] as char);
            }
        }

        KeyRecord::new(key, self.clock.now())
    }
}
