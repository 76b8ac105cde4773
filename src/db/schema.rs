use anyhow::{bail, Context, Result};
use rusqlite::Connection;

/// Schema steps in order; entry `i` upgrades `user_version` i to i + 1.
const STEPS: [&str; 2] = [
    include_str!("schemas/schema_v1.sql"),
    include_str!("schemas/schema_v2.sql"),
];

fn target_version() -> i32 {
    STEPS.len() as i32
}

fn user_version(conn: &Connection) -> Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")
}

/// Apply the missing schema steps in a single transaction.
///
/// A file written by a newer build is refused rather than guessed at.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let current = user_version(conn)?;
    let target = target_version();
    if current > target {
        bail!("preference database is at schema {current}, this build supports up to {target}");
    }

    let pending = &STEPS[current.max(0) as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction().context("failed to begin schema upgrade")?;
    for (offset, sql) in pending.iter().enumerate() {
        let version = current + offset as i32 + 1;
        tx.execute_batch(sql)
            .with_context(|| format!("failed to apply schema v{version}"))?;
    }
    tx.pragma_update(None, "user_version", target)
        .context("failed to bump user_version")?;
    tx.commit().context("failed to commit schema upgrade")
}
