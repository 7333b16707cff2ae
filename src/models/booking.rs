use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::wire;

/// Identifier issued by the booking store. `0` is reserved as the sentinel for
/// "no booking was created" and is never assigned to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookingId(u64);

impl BookingId {
    pub const SENTINEL: BookingId = BookingId(0);

    pub fn new(raw: u64) -> Self {
        BookingId(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_sentinel(self) -> bool {
        self.0 == 0
    }

    /// Row key in SQLite. Ids that do not fit an INTEGER column can never have
    /// been issued, so callers treat `None` as "absent".
    pub fn as_key(self) -> Option<i64> {
        i64::try_from(self.0).ok()
    }

    pub(crate) fn from_key(key: i64) -> Self {
        BookingId(key.max(0) as u64)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(BookingId)
    }
}

impl Serialize for BookingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        wire::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for BookingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        wire::deserialize(deserializer).map(BookingId)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Conceptually final. Not enforced: an admin may still move a booking out
    /// of these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

/// What the customer submits. Free text throughout; only presence is checked.
/// Omitted fields deserialize as empty so they fail validation instead of
/// failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BookingDetails {
    pub name: String,
    pub phone: String,
    pub pickup: String,
    pub dropoff: String,
    pub date: String,
    pub time: String,
    pub vehicle: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl BookingDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("pickup", &self.pickup),
            ("dropoff", &self.dropoff),
            ("date", &self.date),
            ("time", &self.time),
            ("vehicle", &self.vehicle),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRecord {
    pub id: BookingId,
    pub status: BookingStatus,
    /// Nanoseconds since the Unix epoch.
    #[serde(with = "wire")]
    pub created_at: i64,
    pub details: BookingDetails,
}

/// Per-status booking counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct BookingStats {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub completed: u64,
    pub cancelled: u64,
}

impl BookingStats {
    pub fn record(&mut self, status: BookingStatus, count: u64) {
        let slot = match status {
            BookingStatus::Pending => &mut self.pending,
            BookingStatus::Confirmed => &mut self.confirmed,
            BookingStatus::Completed => &mut self.completed,
            BookingStatus::Cancelled => &mut self.cancelled,
        };
        *slot += count;
        self.total += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_details as details;

    #[test]
    fn test_validate_accepts_empty_notes() {
        assert!(details("555-1").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_phone() {
        let err = details("   ").validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("phone"));
        assert_eq!(err.to_string(), "phone is required");
    }

    #[test]
    fn test_booking_id_serializes_as_decimal_string() {
        let json = serde_json::to_value(BookingId::new(42)).unwrap();
        assert_eq!(json, serde_json::json!("42"));
    }

    #[test]
    fn test_booking_id_accepts_string_or_number() {
        let a: BookingId = serde_json::from_str("\"18446744073709551615\"").unwrap();
        assert_eq!(a.get(), u64::MAX);
        assert_eq!(a.as_key(), None);
        let b: BookingId = serde_json::from_str("7").unwrap();
        assert_eq!(b, BookingId::new(7));
    }

    #[test]
    fn test_stats_total_tracks_every_status() {
        let mut stats = BookingStats::default();
        stats.record(BookingStatus::Pending, 2);
        stats.record(BookingStatus::Cancelled, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.confirmed, 0);
        assert_eq!(stats.cancelled, 1);
    }

    #[test]
    fn test_status_wire_names() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::json!(status.as_str()));
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("archived"), None);
    }
}
