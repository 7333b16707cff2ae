//! The booking store: id issuance, record lifecycle and the status machine.

use rusqlite::Connection;

use crate::db::queries;
use crate::models::{BookingDetails, BookingId, BookingRecord, BookingStats, BookingStatus, ValidationError};

/// Result of a submission. A rejected submission stores nothing and reports
/// the sentinel id.
#[derive(Debug)]
pub enum SubmitOutcome {
    Created(BookingRecord),
    Rejected(ValidationError),
}

impl SubmitOutcome {
    pub fn id(&self) -> BookingId {
        match self {
            SubmitOutcome::Created(record) => record.id,
            SubmitOutcome::Rejected(_) => BookingId::SENTINEL,
        }
    }
}

pub fn submit_booking(conn: &mut Connection, details: &BookingDetails) -> anyhow::Result<SubmitOutcome> {
    if let Err(err) = details.validate() {
        tracing::info!(error = %err, "rejected booking submission");
        return Ok(SubmitOutcome::Rejected(err));
    }

    let record = queries::insert_booking(conn, details)?;
    tracing::info!(
        booking_id = %record.id,
        vehicle = %record.details.vehicle,
        "booking submitted"
    );
    Ok(SubmitOutcome::Created(record))
}

/// Any status may replace any other. Returns `false` when the id is unknown.
pub fn update_booking_status(
    conn: &Connection,
    id: BookingId,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let Some(previous) = queries::get_booking_status(conn, id)? else {
        tracing::debug!(booking_id = %id, "status update for unknown booking");
        return Ok(false);
    };

    if previous.is_terminal() && previous != status {
        tracing::warn!(
            booking_id = %id,
            from = previous.as_str(),
            to = status.as_str(),
            "booking moved out of a terminal status"
        );
    }

    let updated = queries::update_booking_status(conn, id, status)?;
    if updated {
        tracing::info!(booking_id = %id, from = previous.as_str(), to = status.as_str(), "booking status updated");
    }
    Ok(updated)
}

pub fn delete_booking(conn: &Connection, id: BookingId) -> anyhow::Result<bool> {
    let deleted = queries::delete_booking(conn, id)?;
    if deleted {
        tracing::info!(booking_id = %id, "booking deleted");
    }
    Ok(deleted)
}

/// Full snapshot in ascending id order.
pub fn all_bookings(conn: &Connection) -> anyhow::Result<Vec<BookingRecord>> {
    queries::get_all_bookings(conn)
}

/// Snapshot restricted to one status, still in ascending id order.
pub fn bookings_with_status(conn: &Connection, status: BookingStatus) -> anyhow::Result<Vec<BookingRecord>> {
    queries::get_bookings_with_status(conn, status)
}

pub fn stats(conn: &Connection) -> anyhow::Result<BookingStats> {
    queries::count_bookings_by_status(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::sample_details;
    use crate::services::lookup;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn submit(conn: &mut Connection, phone: &str) -> BookingId {
        match submit_booking(conn, &sample_details(phone)).unwrap() {
            SubmitOutcome::Created(record) => record.id,
            SubmitOutcome::Rejected(err) => panic!("unexpected rejection: {err}"),
        }
    }

    #[test]
    fn test_submit_creates_pending_booking() {
        let mut conn = setup_db();
        let outcome = submit_booking(&mut conn, &sample_details("555-1")).unwrap();
        let id = outcome.id();
        assert!(!id.is_sentinel());

        let all = all_bookings(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].status, BookingStatus::Pending);
    }

    #[test]
    fn test_ids_strictly_increase_across_deletes() {
        let mut conn = setup_db();
        let mut issued = vec![];
        for i in 0..6 {
            let id = submit(&mut conn, "555-1");
            if i % 2 == 0 {
                assert!(delete_booking(&conn, id).unwrap());
            }
            issued.push(id);
        }
        assert!(issued.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_created_at_non_decreasing() {
        let mut conn = setup_db();
        for _ in 0..5 {
            submit(&mut conn, "555-1");
        }
        let all = all_bookings(&conn).unwrap();
        assert!(all.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn test_rejected_submission_returns_sentinel_and_stores_nothing() {
        let mut conn = setup_db();
        let mut details = sample_details("555-1");
        details.vehicle = String::new();

        let outcome = submit_booking(&mut conn, &details).unwrap();
        assert!(outcome.id().is_sentinel());
        assert!(matches!(outcome, SubmitOutcome::Rejected(ValidationError::MissingField("vehicle"))));
        assert!(all_bookings(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_update_unknown_id_leaves_store_unchanged() {
        let mut conn = setup_db();
        let id = submit(&mut conn, "555-1");
        let before = all_bookings(&conn).unwrap();

        assert!(!update_booking_status(&conn, BookingId::new(42), BookingStatus::Confirmed).unwrap());
        assert_eq!(all_bookings(&conn).unwrap(), before);
        assert_eq!(lookup::status_by_id(&conn, id).unwrap(), Some(BookingStatus::Pending));
    }

    #[test]
    fn test_update_allows_any_transition() {
        let mut conn = setup_db();
        let id = submit(&mut conn, "555-1");

        for status in [
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Pending,
            BookingStatus::Cancelled,
            BookingStatus::Confirmed,
        ] {
            assert!(update_booking_status(&conn, id, status).unwrap());
            assert_eq!(lookup::status_by_id(&conn, id).unwrap(), Some(status));
        }
    }

    #[test]
    fn test_stats_follow_status_updates_and_deletes() {
        let mut conn = setup_db();
        let a = submit(&mut conn, "555-1");
        let b = submit(&mut conn, "555-2");
        update_booking_status(&conn, a, BookingStatus::Cancelled).unwrap();
        delete_booking(&conn, b).unwrap();

        let counts = stats(&conn).unwrap();
        assert_eq!(counts.total, 1);
        assert_eq!(counts.pending, 0);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(bookings_with_status(&conn, BookingStatus::Cancelled).unwrap()[0].id, a);
    }

    #[test]
    fn test_delete_is_permanent() {
        let mut conn = setup_db();
        let id = submit(&mut conn, "555-1");

        assert!(delete_booking(&conn, id).unwrap());
        assert!(!delete_booking(&conn, id).unwrap());
        assert_eq!(lookup::status_by_id(&conn, id).unwrap(), None);
        assert!(all_bookings(&conn).unwrap().iter().all(|b| b.id != id));
        assert!(!update_booking_status(&conn, id, BookingStatus::Confirmed).unwrap());
    }
}
