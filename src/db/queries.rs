use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::models::{
    BookingDetails, BookingId, BookingRecord, BookingStats, BookingStatus, Principal, UserProfile, UserRole,
};

const BOOKING_COLUMNS: &str =
    "id, status, created_at, name, phone, pickup, dropoff, date, time, vehicle, notes";

// ── Bookings ──

/// Inserts a `pending` booking and returns its freshly allocated id.
///
/// The id, the clock bump and the row are written in one immediate
/// transaction; on any error nothing is persisted.
pub fn insert_booking(conn: &mut Connection, details: &BookingDetails) -> anyhow::Result<BookingRecord> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let last: i64 = tx.query_row(
        "SELECT last_created_at FROM booking_clock WHERE singleton = 1",
        [],
        |row| row.get(0),
    )?;
    let created_at = now_nanos().max(last);

    tx.execute(
        "UPDATE booking_clock SET last_created_at = ?1 WHERE singleton = 1",
        params![created_at],
    )?;
    tx.execute(
        "INSERT INTO bookings (status, created_at, name, phone, pickup, dropoff, date, time, vehicle, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            BookingStatus::Pending.as_str(),
            created_at,
            details.name,
            details.phone,
            details.pickup,
            details.dropoff,
            details.date,
            details.time,
            details.vehicle,
            details.notes,
        ],
    )?;
    let id = BookingId::from_key(tx.last_insert_rowid());
    anyhow::ensure!(!id.is_sentinel(), "storage allocated the reserved booking id 0");

    tx.commit()?;

    Ok(BookingRecord {
        id,
        status: BookingStatus::Pending,
        created_at,
        details: details.clone(),
    })
}

pub fn update_booking_status(
    conn: &Connection,
    id: BookingId,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let Some(key) = id.as_key() else {
        return Ok(false);
    };
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), key],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: BookingId) -> anyhow::Result<bool> {
    let Some(key) = id.as_key() else {
        return Ok(false);
    };
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![key])?;
    Ok(count > 0)
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<BookingRecord>> {
    let mut stmt = conn.prepare(&format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY id ASC"))?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: BookingId) -> anyhow::Result<Option<BookingRecord>> {
    let Some(key) = id.as_key() else {
        return Ok(None);
    };
    let result = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![key],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;

    result.transpose()
}

pub fn get_booking_status(conn: &Connection, id: BookingId) -> anyhow::Result<Option<BookingStatus>> {
    let Some(key) = id.as_key() else {
        return Ok(None);
    };
    let status: Option<String> = conn
        .query_row(
            "SELECT status FROM bookings WHERE id = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    status
        .map(|s| BookingStatus::parse(&s).ok_or_else(|| anyhow::anyhow!("unknown booking status in store: {s}")))
        .transpose()
}

pub fn get_bookings_with_status(conn: &Connection, status: BookingStatus) -> anyhow::Result<Vec<BookingRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = ?1 ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![status.as_str()], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn count_bookings_by_status(conn: &Connection) -> anyhow::Result<BookingStats> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM bookings GROUP BY status")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

    let mut stats = BookingStats::default();
    for row in rows {
        let (status_str, count) = row?;
        let status = BookingStatus::parse(&status_str)
            .ok_or_else(|| anyhow::anyhow!("unknown booking status in store: {status_str}"))?;
        stats.record(status, count.max(0) as u64);
    }
    Ok(stats)
}

/// Exact-match phone lookup served by `idx_bookings_phone`.
pub fn get_bookings_for_phone(conn: &Connection, phone: &str) -> anyhow::Result<Vec<BookingRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE phone = ?1 ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![phone], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<BookingRecord> {
    let id: i64 = row.get(0)?;
    let status_str: String = row.get(1)?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| anyhow::anyhow!("unknown booking status in store: {status_str}"))?;

    Ok(BookingRecord {
        id: BookingId::from_key(id),
        status,
        created_at: row.get(2)?,
        details: BookingDetails {
            name: row.get(3)?,
            phone: row.get(4)?,
            pickup: row.get(5)?,
            dropoff: row.get(6)?,
            date: row.get(7)?,
            time: row.get(8)?,
            vehicle: row.get(9)?,
            notes: row.get(10)?,
        },
    })
}

fn now_nanos() -> i64 {
    let now = Utc::now();
    // Out of range only past the year 2262; fall back to microsecond precision.
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000))
}

// ── Roles ──

pub fn get_assigned_role(conn: &Connection, principal: &Principal) -> anyhow::Result<Option<UserRole>> {
    let role: Option<String> = conn
        .query_row(
            "SELECT role FROM user_roles WHERE principal = ?1",
            params![principal.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    role.map(|r| UserRole::parse(&r).ok_or_else(|| anyhow::anyhow!("unknown role in store: {r}")))
        .transpose()
}

pub fn assign_role(conn: &Connection, principal: &Principal, role: UserRole) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO user_roles (principal, role) VALUES (?1, ?2)
         ON CONFLICT(principal) DO UPDATE SET
           role = excluded.role,
           assigned_at = datetime('now')",
        params![principal.as_str(), role.as_str()],
    )?;
    Ok(())
}

// ── Profiles ──

pub fn get_profile(conn: &Connection, principal: &Principal) -> anyhow::Result<Option<UserProfile>> {
    let profile = conn
        .query_row(
            "SELECT name FROM user_profiles WHERE principal = ?1",
            params![principal.as_str()],
            |row| Ok(UserProfile { name: row.get(0)? }),
        )
        .optional()?;
    Ok(profile)
}

pub fn save_profile(conn: &Connection, principal: &Principal, profile: &UserProfile) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO user_profiles (principal, name) VALUES (?1, ?2)
         ON CONFLICT(principal) DO UPDATE SET
           name = excluded.name,
           updated_at = datetime('now')",
        params![principal.as_str(), profile.name],
    )?;
    Ok(())
}

/// First principal (by first save) whose profile name equals `name` exactly.
pub fn find_principal_by_name(conn: &Connection, name: &str) -> anyhow::Result<Option<Principal>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT principal FROM user_profiles WHERE name = ?1 ORDER BY id ASC LIMIT 1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|p| Principal::parse(&p).ok_or_else(|| anyhow::anyhow!("malformed principal in store: {p:?}")))
        .transpose()
}
