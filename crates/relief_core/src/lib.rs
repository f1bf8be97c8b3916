//! Core domain logic for disaster-relief camp tracking.
//! This crate is the single source of truth for camp capacity and
//! resource distribution rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::ReliefConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::camp::{Camp, CampId, CampValidationError, NewCamp};
pub use model::victim::{HealthCondition, NewVictim, Victim, VictimId, VictimValidationError};
pub use repo::camp_repo::{CampDelta, CampRepository, SqliteCampRepository};
pub use repo::victim_repo::{SqliteVictimRepository, VictimDelta, VictimRepository};
pub use repo::{RepoError, RepoResult};
pub use service::distribution::{
    apply_distribution, distribute_resources, plan_distribution, DistributionOutcome,
    DistributionWarning,
};
pub use service::relief_service::{
    CampDetail, DistributionReceipt, ReliefService, RosterEntry, ServiceError, ServiceResult,
    VictimLookup,
};
pub use service::report::{CampOccupancy, ReliefReport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
