use anyhow::Result;
use rusqlite::{params, Connection, Row};

use crate::db::helpers::{from_json, parse_datetime, parse_origin, to_json};
use crate::models::CaptureSnapshot;

struct CaptureRow {
    id: String,
    session_id: String,
    record_id: Option<String>,
    variant: Option<String>,
    mode: String,
    origin: String,
    filters_json: String,
    manual_json: String,
    liked: bool,
    taken_at: String,
}

fn row_to_capture(row: &Row) -> Result<CaptureRow, rusqlite::Error> {
    Ok(CaptureRow {
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        record_id: row.get("record_id")?,
        variant: row.get("variant")?,
        mode: row.get("mode")?,
        origin: row.get("origin")?,
        filters_json: row.get("filters_json")?,
        manual_json: row.get("manual_json")?,
        liked: row.get("liked")?,
        taken_at: row.get("taken_at")?,
    })
}

impl CaptureRow {
    fn into_snapshot(self) -> Result<CaptureSnapshot> {
        Ok(CaptureSnapshot {
            origin: parse_origin(&self.origin)?,
            filters: from_json(&self.filters_json, "filters_json")?,
            manual_adjustments: from_json(&self.manual_json, "manual_json")?,
            taken_at: parse_datetime(&self.taken_at, "taken_at")?,
            id: self.id,
            session_id: self.session_id,
            record_id: self.record_id,
            variant: self.variant,
            mode: self.mode,
            liked: self.liked,
        })
    }
}

pub fn insert(conn: &Connection, user_id: &str, snapshot: &CaptureSnapshot) -> Result<()> {
    conn.execute(
        "INSERT INTO capture_snapshots (
            id, user_id, session_id, record_id, variant, mode, origin,
            filters_json, manual_json, liked, taken_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            snapshot.id,
            user_id,
            snapshot.session_id,
            snapshot.record_id,
            snapshot.variant,
            snapshot.mode,
            snapshot.origin.as_str(),
            to_json(&snapshot.filters, "filters")?,
            to_json(&snapshot.manual_adjustments, "manual_adjustments")?,
            snapshot.liked,
            snapshot.taken_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn for_session(conn: &Connection, session_id: &str) -> Result<Vec<CaptureSnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT id, session_id, record_id, variant, mode, origin,
                filters_json, manual_json, liked, taken_at
         FROM capture_snapshots
         WHERE session_id = ?1
         ORDER BY taken_at ASC, id ASC",
    )?;

    let rows = stmt
        .query_map(params![session_id], row_to_capture)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(CaptureRow::into_snapshot).collect()
}
