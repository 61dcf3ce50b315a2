//! Key record data model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed validity window for newly minted keys
pub const KEY_TTL_HOURS: i64 = 15;

/// A single issued access key
///
/// Serialized camelCase to stay wire-compatible with the persisted
/// collection format (`key`, `createdAt`, `expiresAt`, `used`); `code`
/// is accepted as an alias for `key` on read.
///
/// Records are immutable after creation. They leave the store only by
/// lazy expiration filtering, never by explicit deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    /// Formatted code, `KEY-XXXX-XXXX-XXXX` over `A-Z0-9`
    #[serde(alias = "code")]
    pub key: String,

    /// Mint timestamp
    pub created_at: DateTime<Utc>,

    /// `created_at` + 15h, fixed at mint. Absent on legacy records,
    /// which never expire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Written at mint, never read by any consumer. Kept for wire
    /// compatibility with existing stored collections.
    pub used: bool,
}

impl KeyRecord {
    /// Create a record minted at `now` with the fixed TTL
    pub fn new(key: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            created_at: now,
            expires_at: Some(now + Duration::hours(KEY_TTL_HOURS)),
            used: false,
        }
    }

    /// Whether this record has expired as of `now`
    ///
    /// Records without an expiration never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mint_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_record_ttl() {
        let record = KeyRecord::new("KEY-AAAA-BBBB-CCCC", mint_time());
        assert_eq!(
            record.expires_at.unwrap() - record.created_at,
            Duration::hours(15)
        );
        assert!(!record.used);
    }

    #[test]
    fn test_expiry_boundary() {
        let record = KeyRecord::new("KEY-AAAA-BBBB-CCCC", mint_time());
        let expires_at = record.expires_at.unwrap();

        assert!(!record.is_expired(expires_at - Duration::seconds(1)));
        // Exactly at expiration counts as expired
        assert!(record.is_expired(expires_at));
        assert!(record.is_expired(expires_at + Duration::hours(1)));
    }

    #[test]
    fn test_legacy_record_never_expires() {
        let mut record = KeyRecord::new("KEY-AAAA-BBBB-CCCC", mint_time());
        record.expires_at = None;
        assert!(!record.is_expired(mint_time() + Duration::days(365)));
    }

    #[test]
    fn test_wire_format_camel_case() {
        let record = KeyRecord::new("KEY-AAAA-BBBB-CCCC", mint_time());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"key\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"expiresAt\""));
        assert!(json.contains("\"used\""));
    }

    #[test]
    fn test_code_alias_accepted() {
        let json = r#"{"code":"KEY-AAAA-BBBB-CCCC","createdAt":"2026-01-05T12:00:00Z","used":false}"#;
        let record: KeyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.key, "KEY-AAAA-BBBB-CCCC");
        assert!(record.expires_at.is_none());
    }
}
