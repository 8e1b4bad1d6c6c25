use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored password entry. The `password` field holds the base64
/// ciphertext envelope from the moment the record is created; plaintext
/// never enters the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordRecord {
    pub id: u64,
    pub site: String,
    pub username: String,
    pub password: String,
    pub created: DateTime<Utc>,
}

impl PasswordRecord {
    pub fn new(id: u64, site: String, username: String, password: String) -> Self {
        Self {
            id,
            site,
            username,
            password,
            created: Utc::now(),
        }
    }
}

/// Id for the next record: one past the highest id currently present.
/// Removal leaves holes; ids are never renumbered.
pub fn next_id(records: &[PasswordRecord]) -> u64 {
    records.iter().map(|r| r.id).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> PasswordRecord {
        PasswordRecord::new(id, "site".into(), "user".into(), "ZW52ZWxvcGU=".into())
    }

    #[test]
    fn first_id_is_one() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn next_id_skips_holes_left_by_removal() {
        let records = vec![record(1), record(3)];
        assert_eq!(next_id(&records), 4);
    }

    #[test]
    fn serializes_created_as_rfc3339() {
        let json = serde_json::to_string(&record(7)).expect("serialize");
        let parsed: PasswordRecord = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.id, 7);
        assert!(json.contains("\"created\":\""));
    }
}
