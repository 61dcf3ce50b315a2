//! Display formatting
//!
//! Pure string formatting over stored records. No state, no side
//! effects; consumes [`KeyStore`](crate::store::KeyStore) output.

use crate::record::KeyRecord;
use chrono::{DateTime, Utc};

/// en-US-style short date, e.g. `Jan 5, 2026, 03:04 PM`
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Countdown string for an expiration
///
/// `"Expires in {H}h {M}m"` (floor division), `"Expired"` once
/// `expires_at <= now`, `"No expiration"` when absent.
pub fn format_time_remaining(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let expires_at = match expires_at {
        Some(expires_at) => expires_at,
        None => return "No expiration".to_string(),
    };

    let remaining = expires_at - now;
    if remaining <= chrono::Duration::zero() {
        return "Expired".to_string();
    }

    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;
    format!("Expires in {hours}h {minutes}m")
}

/// Display view of one stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCard {
    /// 1-based position in the listing
    pub index: usize,
    /// The formatted code itself
    pub code: String,
    /// Formatted creation date
    pub created: String,
    /// Countdown / "Expired" / "No expiration"
    pub remaining: String,
    /// Gates the copy action in the UI
    pub expired: bool,
}

impl KeyCard {
    /// Build the card for a record as of `now`
    pub fn from_record(index: usize, record: &KeyRecord, now: DateTime<Utc>) -> Self {
        let remaining = format_time_remaining(record.expires_at, now);
        let expired = remaining == "Expired";
        Self {
            index,
            code: record.key.clone(),
            created: format_date(record.created_at),
            remaining,
            expired,
        }
    }
}
