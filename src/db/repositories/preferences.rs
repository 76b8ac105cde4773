use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::db::helpers::{from_json, parse_datetime, to_i64, to_json, to_u32};
use crate::models::PreferenceRecord;

struct PreferenceRow {
    id: String,
    context_json: String,
    settings_json: String,
    filters_json: String,
    mode: String,
    manual_json: String,
    usage_count: i64,
    is_liked: bool,
    last_used: String,
}

fn row_to_preference(row: &Row) -> Result<PreferenceRow, rusqlite::Error> {
    Ok(PreferenceRow {
        id: row.get("id")?,
        context_json: row.get("context_json")?,
        settings_json: row.get("settings_json")?,
        filters_json: row.get("filters_json")?,
        mode: row.get("mode")?,
        manual_json: row.get("manual_json")?,
        usage_count: row.get("usage_count")?,
        is_liked: row.get("is_liked")?,
        last_used: row.get("last_used")?,
    })
}

impl PreferenceRow {
    fn into_record(self) -> Result<PreferenceRecord> {
        Ok(PreferenceRecord {
            context: from_json(&self.context_json, "context_json")?,
            settings: from_json(&self.settings_json, "settings_json")?,
            filters: from_json(&self.filters_json, "filters_json")?,
            manual_adjustments: from_json(&self.manual_json, "manual_json")?,
            usage_count: to_u32(self.usage_count, "usage_count")?,
            last_used: parse_datetime(&self.last_used, "last_used")?,
            is_liked: self.is_liked,
            mode: self.mode,
            id: self.id,
        })
    }
}

/// Every record stored for `user_id`, strongest first.
pub fn load(conn: &Connection, user_id: &str) -> Result<Vec<PreferenceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, context_json, settings_json, filters_json, mode,
                manual_json, usage_count, is_liked, last_used
         FROM preference_records
         WHERE user_id = ?1
         ORDER BY is_liked DESC, usage_count DESC, last_used DESC",
    )?;

    let rows = stmt
        .query_map(params![user_id], row_to_preference)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|row| {
            let id = row.id.clone();
            row.into_record()
                .with_context(|| format!("corrupt preference record {id}"))
        })
        .collect()
}

/// Swap the user's record set for `records`. Other users are untouched.
pub fn replace(conn: &mut Connection, user_id: &str, records: &[PreferenceRecord]) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM preference_records WHERE user_id = ?1",
        params![user_id],
    )?;

    {
        let mut insert = tx.prepare(
            "INSERT INTO preference_records (
                id, user_id, object_type, context_json, settings_json, filters_json,
                mode, manual_json, usage_count, is_liked, last_used
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        for record in records {
            insert
                .execute(params![
                    record.id,
                    user_id,
                    record.context.object_type,
                    to_json(&record.context, "context")?,
                    to_json(&record.settings, "settings")?,
                    to_json(&record.filters, "filters")?,
                    record.mode,
                    to_json(&record.manual_adjustments, "manual_adjustments")?,
                    to_i64(record.usage_count),
                    record.is_liked,
                    record.last_used.to_rfc3339(),
                ])
                .with_context(|| format!("failed to store preference record {}", record.id))?;
        }
    }

    tx.commit()?;
    Ok(())
}

pub fn count(conn: &Connection, user_id: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM preference_records WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(count).unwrap_or(0))
}
