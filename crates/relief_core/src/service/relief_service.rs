//! Relief use-case service.
//!
//! # Responsibility
//! - Validate boundary input for camp and victim registration.
//! - Run registration and manual distribution as single transactions.
//! - Provide the read views used by front ends (detail, roster, report).
//!
//! # Invariants
//! - A rejected call writes nothing.
//! - Registration increments occupancy, inserts the victim and distributes
//!   in one immediate transaction; a failure at any step rolls back all three.
//! - Snapshots handed to the distribution engine are read inside the same
//!   transaction that applies the deltas.

use crate::model::camp::{Camp, CampId, CampValidationError, NewCamp};
use crate::model::victim::{NewVictim, Victim, VictimId, VictimValidationError};
use crate::repo::camp_repo::{CampDelta, CampRepository, SqliteCampRepository};
use crate::repo::victim_repo::{SqliteVictimRepository, VictimRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::distribution::{apply_distribution, DistributionOutcome};
use crate::service::report::ReliefReport;
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for relief use-cases.
#[derive(Debug)]
pub enum ServiceError {
    InvalidCamp(CampValidationError),
    InvalidVictim(VictimValidationError),
    CampNotFound(CampId),
    VictimNotFound(VictimId),
    /// Registration target has no free place left.
    CampFull {
        camp_id: CampId,
        location: String,
        current_occupancy: i64,
        max_capacity: i64,
    },
    /// Victim row carries no camp, so there is no stock to draw from.
    VictimUnassigned(VictimId),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCamp(err) => write!(f, "invalid camp: {err}"),
            Self::InvalidVictim(err) => write!(f, "invalid victim: {err}"),
            Self::CampNotFound(id) => write!(f, "camp not found: {id}"),
            Self::VictimNotFound(id) => write!(f, "victim not found: {id}"),
            Self::CampFull {
                location,
                current_occupancy,
                max_capacity,
                ..
            } => write!(
                f,
                "camp `{location}` is full ({current_occupancy}/{max_capacity}); choose another camp"
            ),
            Self::VictimUnassigned(id) => write!(f, "victim {id} is not assigned to any camp"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent relief state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCamp(err) => Some(err),
            Self::InvalidVictim(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CampValidationError> for ServiceError {
    fn from(value: CampValidationError) -> Self {
        Self::InvalidCamp(value)
    }
}

impl From<VictimValidationError> for ServiceError {
    fn from(value: VictimValidationError) -> Self {
        Self::InvalidVictim(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CampNotFound(id) => Self::CampNotFound(id),
            RepoError::VictimNotFound(id) => Self::VictimNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// What one victim received in one distribution event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReceipt {
    pub victim_id: VictimId,
    pub victim_name: String,
    pub camp_id: CampId,
    pub outcome: DistributionOutcome,
}

/// Victim search result with the camp it points at, when that camp exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictimLookup {
    pub victim: Victim,
    pub camp: Option<Camp>,
}

/// Camp with every victim assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampDetail {
    pub camp: Camp,
    pub victims: Vec<Victim>,
}

/// Roster line: a victim and the location label of their camp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub victim: Victim,
    pub camp_location: Option<String>,
}

/// Relief service facade over one SQLite connection.
pub struct ReliefService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> ReliefService<'conn> {
    /// Creates a service over a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn camps(&self) -> SqliteCampRepository<'_> {
        SqliteCampRepository::new(&*self.conn)
    }

    fn victims(&self) -> SqliteVictimRepository<'_> {
        SqliteVictimRepository::new(&*self.conn)
    }

    /// Validates and registers a new camp.
    ///
    /// The location is stored trimmed.
    pub fn create_camp(&self, camp: &NewCamp) -> ServiceResult<CampId> {
        camp.validate()?;
        let camp = NewCamp {
            location: camp.location.trim().to_string(),
            ..camp.clone()
        };

        let camp_id = self.camps().create_camp(&camp)?;
        info!(
            "event=camp_register module=service status=ok camp_id={} max_capacity={}",
            camp_id, camp.max_capacity
        );
        Ok(camp_id)
    }

    pub fn get_camp(&self, camp_id: CampId) -> RepoResult<Option<Camp>> {
        self.camps().get_camp(camp_id)
    }

    pub fn list_camps(&self) -> RepoResult<Vec<Camp>> {
        self.camps().list_camps()
    }

    /// Camps that can still take a registration.
    pub fn list_available_camps(&self) -> RepoResult<Vec<Camp>> {
        self.camps().list_available_camps()
    }

    pub fn list_victims(&self) -> RepoResult<Vec<Victim>> {
        self.victims().list_victims()
    }

    /// Registers a victim into a camp and hands out the first distribution.
    ///
    /// # Errors
    /// - `InvalidVictim` for bad name or age.
    /// - `CampNotFound` when the camp does not exist.
    /// - `CampFull` when the camp has no free place; occupancy is unchanged.
    pub fn register_victim(&mut self, victim: &NewVictim) -> ServiceResult<DistributionReceipt> {
        victim.validate()?;
        let victim = NewVictim {
            name: victim.name.trim().to_string(),
            ..victim.clone()
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let receipt = {
            let camps = SqliteCampRepository::new(&tx);
            let victims = SqliteVictimRepository::new(&tx);

            let camp = camps
                .get_camp(victim.camp_id)?
                .ok_or(ServiceError::CampNotFound(victim.camp_id))?;
            if camp.is_full() {
                warn!(
                    "event=victim_register module=service status=rejected camp_id={} reason=camp_full",
                    camp.camp_id
                );
                return Err(ServiceError::CampFull {
                    camp_id: camp.camp_id,
                    location: camp.location,
                    current_occupancy: camp.current_occupancy,
                    max_capacity: camp.max_capacity,
                });
            }

            camps.apply_camp_delta(camp.camp_id, &CampDelta::occupancy(1))?;
            let victim_id = victims.create_victim(&victim)?;

            let stored = victims
                .get_victim(victim_id)?
                .ok_or(ServiceError::InconsistentState(
                    "registered victim not found in read-back",
                ))?;
            let camp = camps
                .get_camp(camp.camp_id)?
                .ok_or(ServiceError::InconsistentState(
                    "registration camp vanished during registration",
                ))?;

            let outcome = apply_distribution(&camps, &victims, &stored, &camp)?;
            DistributionReceipt {
                victim_id,
                victim_name: stored.name,
                camp_id: camp.camp_id,
                outcome,
            }
        };
        tx.commit()?;

        info!(
            "event=victim_register module=service status=ok victim_id={} camp_id={}",
            receipt.victim_id, receipt.camp_id
        );
        Ok(receipt)
    }

    /// Runs one manual distribution for an already registered victim.
    ///
    /// # Errors
    /// - `VictimNotFound` when the victim does not exist.
    /// - `VictimUnassigned` when the victim has no camp.
    /// - `CampNotFound` when the assigned camp row is missing.
    pub fn distribute_to_victim(
        &mut self,
        victim_id: VictimId,
    ) -> ServiceResult<DistributionReceipt> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let receipt = {
            let camps = SqliteCampRepository::new(&tx);
            let victims = SqliteVictimRepository::new(&tx);

            let victim = victims
                .get_victim(victim_id)?
                .ok_or(ServiceError::VictimNotFound(victim_id))?;
            let camp_id = victim
                .assigned_camp_id
                .ok_or(ServiceError::VictimUnassigned(victim_id))?;
            let camp = camps
                .get_camp(camp_id)?
                .ok_or(ServiceError::CampNotFound(camp_id))?;

            let outcome = apply_distribution(&camps, &victims, &victim, &camp)?;
            DistributionReceipt {
                victim_id,
                victim_name: victim.name,
                camp_id,
                outcome,
            }
        };
        tx.commit()?;
        Ok(receipt)
    }

    /// Looks up one victim together with their camp.
    pub fn find_victim(&self, victim_id: VictimId) -> ServiceResult<Option<VictimLookup>> {
        let Some(victim) = self.victims().get_victim(victim_id)? else {
            return Ok(None);
        };
        let camp = match victim.assigned_camp_id {
            Some(camp_id) => self.camps().get_camp(camp_id)?,
            None => None,
        };
        Ok(Some(VictimLookup { victim, camp }))
    }

    /// Returns a camp and its victims, or `None` for an unknown camp.
    pub fn camp_detail(&self, camp_id: CampId) -> ServiceResult<Option<CampDetail>> {
        let Some(camp) = self.camps().get_camp(camp_id)? else {
            return Ok(None);
        };
        let victims = self.victims().list_victims_for_camp(camp_id)?;
        Ok(Some(CampDetail { camp, victims }))
    }

    /// Lists every victim with their camp's location label.
    pub fn victim_roster(&self) -> ServiceResult<Vec<RosterEntry>> {
        let locations = self
            .camps()
            .list_camps()?
            .into_iter()
            .map(|camp| (camp.camp_id, camp.location))
            .collect::<BTreeMap<_, _>>();

        let roster = self
            .victims()
            .list_victims()?
            .into_iter()
            .map(|victim| {
                let camp_location = victim
                    .assigned_camp_id
                    .and_then(|camp_id| locations.get(&camp_id).cloned());
                RosterEntry {
                    victim,
                    camp_location,
                }
            })
            .collect();
        Ok(roster)
    }

    /// Builds the summary report from the current record set.
    pub fn report(&self) -> ServiceResult<ReliefReport> {
        let camps = self.camps().list_camps()?;
        let victims = self.victims().list_victims()?;
        Ok(ReliefReport::from_records(&camps, &victims))
    }
}
