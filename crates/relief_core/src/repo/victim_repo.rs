//! Victim repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read and delta-update APIs over `victims` storage.
//!
//! # Invariants
//! - Listings are ordered by `victim_id ASC`.
//! - Distribution counters start at zero and only change through
//!   `apply_victim_delta`.
//! - `assigned_camp_id` must reference an existing camp (enforced by SQLite).

use crate::model::camp::CampId;
use crate::model::victim::{HealthCondition, NewVictim, Victim, VictimId};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const VICTIM_SELECT_SQL: &str = "SELECT
    victim_id,
    name,
    age,
    health_condition,
    assigned_camp_id,
    food_distributed,
    medical_kits_distributed
FROM victims";

/// Signed adjustments to a victim's cumulative aid counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VictimDelta {
    pub food: i64,
    pub medical_kits: i64,
}

/// Repository interface for victim records.
pub trait VictimRepository {
    /// Inserts a victim with zeroed counters and returns its new id.
    fn create_victim(&self, victim: &NewVictim) -> RepoResult<VictimId>;
    fn get_victim(&self, id: VictimId) -> RepoResult<Option<Victim>>;
    fn list_victims(&self) -> RepoResult<Vec<Victim>>;
    fn list_victims_for_camp(&self, camp_id: CampId) -> RepoResult<Vec<Victim>>;
    /// Adds signed deltas to both distribution counters atomically.
    fn apply_victim_delta(&self, id: VictimId, delta: &VictimDelta) -> RepoResult<()>;
}

/// SQLite-backed victim repository.
pub struct SqliteVictimRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVictimRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl VictimRepository for SqliteVictimRepository<'_> {
    fn create_victim(&self, victim: &NewVictim) -> RepoResult<VictimId> {
        self.conn.execute(
            "INSERT INTO victims (
                name,
                age,
                health_condition,
                assigned_camp_id
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                victim.name.as_str(),
                victim.age,
                victim.health_condition.as_str(),
                victim.camp_id,
            ],
        )?;

        let victim_id = self.conn.last_insert_rowid();
        debug!(
            "event=victim_create module=repo status=ok victim_id={} camp_id={}",
            victim_id, victim.camp_id
        );
        Ok(victim_id)
    }

    fn get_victim(&self, id: VictimId) -> RepoResult<Option<Victim>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VICTIM_SELECT_SQL} WHERE victim_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_victim_row(row)?));
        }
        Ok(None)
    }

    fn list_victims(&self) -> RepoResult<Vec<Victim>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VICTIM_SELECT_SQL} ORDER BY victim_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut victims = Vec::new();
        while let Some(row) = rows.next()? {
            victims.push(parse_victim_row(row)?);
        }
        Ok(victims)
    }

    fn list_victims_for_camp(&self, camp_id: CampId) -> RepoResult<Vec<Victim>> {
        let mut stmt = self.conn.prepare(&format!(
            "{VICTIM_SELECT_SQL}
             WHERE assigned_camp_id = ?1
             ORDER BY victim_id ASC;"
        ))?;
        let mut rows = stmt.query([camp_id])?;
        let mut victims = Vec::new();
        while let Some(row) = rows.next()? {
            victims.push(parse_victim_row(row)?);
        }
        Ok(victims)
    }

    fn apply_victim_delta(&self, id: VictimId, delta: &VictimDelta) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE victims
             SET
                food_distributed = food_distributed + ?1,
                medical_kits_distributed = medical_kits_distributed + ?2
             WHERE victim_id = ?3;",
            params![delta.food, delta.medical_kits, id],
        )?;

        if changed == 0 {
            return Err(RepoError::VictimNotFound(id));
        }

        debug!(
            "event=victim_delta module=repo status=ok victim_id={} food_delta={} kits_delta={}",
            id, delta.food, delta.medical_kits
        );
        Ok(())
    }
}

fn parse_victim_row(row: &Row<'_>) -> RepoResult<Victim> {
    let condition_text: String = row.get("health_condition")?;
    let health_condition = HealthCondition::from_label(&condition_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid health condition `{condition_text}` in victims.health_condition"
        ))
    })?;

    Ok(Victim {
        victim_id: row.get("victim_id")?,
        name: row.get("name")?,
        age: row.get("age")?,
        health_condition,
        assigned_camp_id: row.get("assigned_camp_id")?,
        food_distributed: row.get("food_distributed")?,
        medical_kits_distributed: row.get("medical_kits_distributed")?,
    })
}
