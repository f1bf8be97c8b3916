//! Ordered schema scripts for the relief store.
//!
//! Versions start at 1 and have no gaps, so the scripts still to run for a
//! store at version `n` are exactly the tail after the first `n` entries.
//! The store's version lives in `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// One schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "camps_victims",
        sql: include_str!("0001_camps_victims.sql"),
    },
    Migration {
        version: 2,
        name: "victim_camp_index",
        sql: include_str!("0002_victim_camp_index.sql"),
    },
];

/// Every migration this build ships, oldest first.
pub fn all() -> &'static [Migration] {
    MIGRATIONS
}

/// Schema version a fully upgraded store reports.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Reads the store's recorded schema version.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Scripts a store at `version` still needs.
///
/// # Errors
/// - `SchemaTooNew` when `version` is past [`latest_version`].
pub fn pending_after(version: u32) -> DbResult<&'static [Migration]> {
    MIGRATIONS
        .get(version as usize..)
        .ok_or(DbError::SchemaTooNew {
            found: version,
            supported: latest_version(),
        })
}

/// Brings `conn` up to [`latest_version`].
///
/// All pending scripts share one transaction: a failing script leaves the
/// store at the version it had before the call.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let pending = pending_after(from)?;
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
        from,
        latest_version(),
        pending.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{all, latest_version, pending_after};
    use crate::db::DbError;

    #[test]
    fn versions_are_contiguous_from_one() {
        for (index, step) in all().iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "gap at `{}`", step.name);
        }
    }

    #[test]
    fn pending_after_returns_the_tail() {
        assert_eq!(pending_after(0).unwrap().len(), all().len());
        let tail = pending_after(1).unwrap();
        assert_eq!(tail[0].name, "victim_camp_index");
        assert!(pending_after(latest_version()).unwrap().is_empty());
        assert!(matches!(
            pending_after(latest_version() + 1),
            Err(DbError::SchemaTooNew { .. })
        ));
    }
}
