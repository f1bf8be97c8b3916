//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define record-level data access for camps and victims.
//! - Isolate SQLite query details from distribution and registration logic.
//!
//! # Invariants
//! - Counter changes are applied as single-statement deltas, never as
//!   absolute overwrites.
//! - Repositories do not validate input or clamp values; callers do.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::camp::CampId;
use crate::model::victim::VictimId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod camp_repo;
pub mod victim_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by camp and victim persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    CampNotFound(CampId),
    VictimNotFound(VictimId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::CampNotFound(id) => write!(f, "camp not found: {id}"),
            Self::VictimNotFound(id) => write!(f, "victim not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted relief data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::CampNotFound(_) | Self::VictimNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
