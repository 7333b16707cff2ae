//! Read-side queries: status by id, bookings by phone, and the combined
//! status-page search.

use rusqlite::Connection;

use crate::db::queries;
use crate::models::{BookingId, BookingRecord, BookingStatus};

/// How phone lookups are answered. Both return exactly the records whose
/// phone equals the query byte for byte, in ascending id order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhoneLookup {
    /// Linear pass over every stored booking. O(n) per query.
    Scan,
    /// Served by the `(phone, id)` index, kept in step with every write by
    /// the storage engine.
    #[default]
    Indexed,
}

impl PhoneLookup {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scan" => Some(PhoneLookup::Scan),
            "indexed" => Some(PhoneLookup::Indexed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneLookup::Scan => "scan",
            PhoneLookup::Indexed => "indexed",
        }
    }
}

pub fn status_by_id(conn: &Connection, id: BookingId) -> anyhow::Result<Option<BookingStatus>> {
    queries::get_booking_status(conn, id)
}

pub fn bookings_by_phone(
    conn: &Connection,
    phone: &str,
    strategy: PhoneLookup,
) -> anyhow::Result<Vec<BookingRecord>> {
    if phone.is_empty() {
        return Ok(vec![]);
    }

    match strategy {
        PhoneLookup::Scan => Ok(queries::get_all_bookings(conn)?
            .into_iter()
            .filter(|b| b.details.phone == phone)
            .collect()),
        PhoneLookup::Indexed => queries::get_bookings_for_phone(conn, phone),
    }
}

/// Free-form status search as typed by a customer: `#123`, `123` or a phone
/// number. A numeric query naming an existing booking returns that booking;
/// anything else falls through to the exact phone lookup.
pub fn search(conn: &Connection, query: &str, strategy: PhoneLookup) -> anyhow::Result<Vec<BookingRecord>> {
    let trimmed = query.trim();
    let cleaned = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if !cleaned.is_empty() && cleaned.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(id) = cleaned.parse::<BookingId>() {
            if let Some(record) = queries::get_booking_by_id(conn, id)? {
                return Ok(vec![record]);
            }
        }
    }

    bookings_by_phone(conn, cleaned, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::sample_details;
    use crate::services::bookings::{self, SubmitOutcome};

    const STRATEGIES: [PhoneLookup; 2] = [PhoneLookup::Scan, PhoneLookup::Indexed];

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn submit(conn: &mut Connection, phone: &str) -> BookingId {
        match bookings::submit_booking(conn, &sample_details(phone)).unwrap() {
            SubmitOutcome::Created(record) => record.id,
            SubmitOutcome::Rejected(err) => panic!("unexpected rejection: {err}"),
        }
    }

    fn ids(records: &[BookingRecord]) -> Vec<BookingId> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_phone_lookup_matches_and_survives_delete() {
        for strategy in STRATEGIES {
            let mut conn = setup_db();
            let first = submit(&mut conn, "555-1");
            let _second = submit(&mut conn, "555-2");
            let third = submit(&mut conn, "555-1");

            let found = bookings_by_phone(&conn, "555-1", strategy).unwrap();
            assert_eq!(ids(&found), vec![first, third], "strategy {}", strategy.as_str());

            assert!(bookings::delete_booking(&conn, first).unwrap());
            let found = bookings_by_phone(&conn, "555-1", strategy).unwrap();
            assert_eq!(ids(&found), vec![third], "strategy {}", strategy.as_str());
        }
    }

    #[test]
    fn test_phone_lookup_is_exact() {
        for strategy in STRATEGIES {
            let mut conn = setup_db();
            submit(&mut conn, "+91 98300 12345");

            assert!(bookings_by_phone(&conn, "+919830012345", strategy).unwrap().is_empty());
            assert!(bookings_by_phone(&conn, "98300", strategy).unwrap().is_empty());
            assert!(bookings_by_phone(&conn, "+91 98300 12345 ", strategy).unwrap().is_empty());
            assert!(bookings_by_phone(&conn, "", strategy).unwrap().is_empty());
            assert_eq!(bookings_by_phone(&conn, "+91 98300 12345", strategy).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_status_by_id_absent_for_unknown() {
        let conn = setup_db();
        assert_eq!(status_by_id(&conn, BookingId::new(1)).unwrap(), None);
        assert_eq!(status_by_id(&conn, BookingId::SENTINEL).unwrap(), None);
    }

    #[test]
    fn test_search_by_hash_id() {
        let mut conn = setup_db();
        let _first = submit(&mut conn, "555-1");
        let second = submit(&mut conn, "555-2");

        let found = search(&conn, &format!("  #{second} "), PhoneLookup::Indexed).unwrap();
        assert_eq!(ids(&found), vec![second]);
    }

    #[test]
    fn test_search_numeric_falls_back_to_phone() {
        let mut conn = setup_db();
        let id = submit(&mut conn, "9830012345");

        let found = search(&conn, "9830012345", PhoneLookup::Indexed).unwrap();
        assert_eq!(ids(&found), vec![id]);
    }

    #[test]
    fn test_search_phone_fallback_drops_leading_hash() {
        let mut conn = setup_db();
        let id = submit(&mut conn, "555-1");
        submit(&mut conn, "#555-1");

        let found = search(&conn, " #555-1 ", PhoneLookup::Scan).unwrap();
        assert_eq!(ids(&found), vec![id]);
    }

    #[test]
    fn test_search_blank_query_is_empty() {
        let mut conn = setup_db();
        submit(&mut conn, "555-1");
        assert!(search(&conn, "   ", PhoneLookup::Scan).unwrap().is_empty());
        assert!(search(&conn, "#", PhoneLookup::Scan).unwrap().is_empty());
    }
}
