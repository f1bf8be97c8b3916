//! Camp repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read and delta-update APIs over `camps` storage.
//!
//! # Invariants
//! - Listings are ordered by `camp_id ASC`.
//! - `apply_camp_delta` is one `UPDATE` statement; stock may go negative if
//!   the caller asks for it.

use crate::model::camp::{Camp, CampId, NewCamp};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const CAMP_SELECT_SQL: &str = "SELECT
    camp_id,
    location,
    max_capacity,
    available_food,
    available_medical_kits,
    volunteers,
    current_occupancy
FROM camps";

/// Signed adjustments applied to one camp in a single write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampDelta {
    pub food: i64,
    pub medical_kits: i64,
    pub occupancy: i64,
}

impl CampDelta {
    /// Delta that only moves occupancy.
    pub fn occupancy(occupancy: i64) -> Self {
        Self {
            occupancy,
            ..Self::default()
        }
    }

    /// Delta that only moves stock.
    pub fn stock(food: i64, medical_kits: i64) -> Self {
        Self {
            food,
            medical_kits,
            occupancy: 0,
        }
    }
}

/// Repository interface for camp records.
pub trait CampRepository {
    /// Inserts a camp with zero occupancy and returns its new id.
    fn create_camp(&self, camp: &NewCamp) -> RepoResult<CampId>;
    fn get_camp(&self, id: CampId) -> RepoResult<Option<Camp>>;
    fn list_camps(&self) -> RepoResult<Vec<Camp>>;
    /// Lists camps with `current_occupancy < max_capacity`.
    fn list_available_camps(&self) -> RepoResult<Vec<Camp>>;
    /// Adds signed deltas to stock and occupancy atomically.
    fn apply_camp_delta(&self, id: CampId, delta: &CampDelta) -> RepoResult<()>;
}

/// SQLite-backed camp repository.
///
/// Works on a plain connection or, through deref, on an open transaction.
pub struct SqliteCampRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCampRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CampRepository for SqliteCampRepository<'_> {
    fn create_camp(&self, camp: &NewCamp) -> RepoResult<CampId> {
        self.conn.execute(
            "INSERT INTO camps (
                location,
                max_capacity,
                available_food,
                available_medical_kits,
                volunteers
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                camp.location.as_str(),
                camp.max_capacity,
                camp.available_food,
                camp.available_medical_kits,
                camp.volunteers,
            ],
        )?;

        let camp_id = self.conn.last_insert_rowid();
        debug!("event=camp_create module=repo status=ok camp_id={camp_id}");
        Ok(camp_id)
    }

    fn get_camp(&self, id: CampId) -> RepoResult<Option<Camp>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CAMP_SELECT_SQL} WHERE camp_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_camp_row(row)?));
        }
        Ok(None)
    }

    fn list_camps(&self) -> RepoResult<Vec<Camp>> {
        query_camps(self.conn, &format!("{CAMP_SELECT_SQL} ORDER BY camp_id ASC;"))
    }

    fn list_available_camps(&self) -> RepoResult<Vec<Camp>> {
        query_camps(
            self.conn,
            &format!(
                "{CAMP_SELECT_SQL}
                 WHERE current_occupancy < max_capacity
                 ORDER BY camp_id ASC;"
            ),
        )
    }

    fn apply_camp_delta(&self, id: CampId, delta: &CampDelta) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE camps
             SET
                available_food = available_food + ?1,
                available_medical_kits = available_medical_kits + ?2,
                current_occupancy = current_occupancy + ?3
             WHERE camp_id = ?4;",
            params![delta.food, delta.medical_kits, delta.occupancy, id],
        )?;

        if changed == 0 {
            return Err(RepoError::CampNotFound(id));
        }

        debug!(
            "event=camp_delta module=repo status=ok camp_id={} food_delta={} kits_delta={} occupancy_delta={}",
            id, delta.food, delta.medical_kits, delta.occupancy
        );
        Ok(())
    }
}

fn query_camps(conn: &Connection, sql: &str) -> RepoResult<Vec<Camp>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut camps = Vec::new();
    while let Some(row) = rows.next()? {
        camps.push(parse_camp_row(row)?);
    }
    Ok(camps)
}

fn parse_camp_row(row: &Row<'_>) -> rusqlite::Result<Camp> {
    Ok(Camp {
        camp_id: row.get("camp_id")?,
        location: row.get("location")?,
        max_capacity: row.get("max_capacity")?,
        available_food: row.get("available_food")?,
        available_medical_kits: row.get("available_medical_kits")?,
        volunteers: row.get("volunteers")?,
        current_occupancy: row.get("current_occupancy")?,
    })
}
