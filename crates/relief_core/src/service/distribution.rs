//! Resource distribution engine.
//!
//! # Responsibility
//! - Decide how much food and how many medical kits one victim receives
//!   from the camp they are assigned to.
//! - Apply the resulting stock and counter deltas together.
//!
//! # Invariants
//! - At most one food packet and one medical kit per invocation.
//! - Critical victims get a kit whenever any is in stock.
//! - Normal victims never take the camp's last kit.
//! - Both delta-updates are issued even when nothing is granted.
//! - The engine trusts its snapshots: it does not re-read the camp and does
//!   not check that the victim belongs to it.

use crate::model::camp::Camp;
use crate::model::victim::Victim;
use crate::repo::camp_repo::{CampDelta, CampRepository, SqliteCampRepository};
use crate::repo::victim_repo::{SqliteVictimRepository, VictimDelta, VictimRepository};
use crate::repo::RepoResult;
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Minimum kit stock before a normal-condition victim may take one.
pub const NORMAL_KIT_RESERVE_FLOOR: i64 = 2;

/// Shortage noticed while distributing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionWarning {
    NoFood,
    /// A critical victim could not receive a kit.
    CriticalKitShortage,
}

impl Display for DistributionWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFood => f.write_str("No food packets available in this camp."),
            Self::CriticalKitShortage => {
                f.write_str("CRITICAL victim - no medical kits available in camp!")
            }
        }
    }
}

/// Result of one distribution event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionOutcome {
    /// Either 0 or 1.
    pub food_granted: i64,
    /// Either 0 or 1.
    pub kits_granted: i64,
    /// Warnings in the order they were raised (food first).
    pub warnings: Vec<DistributionWarning>,
}

impl DistributionOutcome {
    /// Returns whether nothing was handed out.
    pub fn is_empty(&self) -> bool {
        self.food_granted == 0 && self.kits_granted == 0
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    fn camp_delta(&self) -> CampDelta {
        CampDelta::stock(-self.food_granted, -self.kits_granted)
    }

    fn victim_delta(&self) -> VictimDelta {
        VictimDelta {
            food: self.food_granted,
            medical_kits: self.kits_granted,
        }
    }
}

/// Computes grants for `victim` from `camp` without touching storage.
pub fn plan_distribution(victim: &Victim, camp: &Camp) -> DistributionOutcome {
    let mut outcome = DistributionOutcome::default();

    if camp.available_food > 0 {
        outcome.food_granted = 1;
    } else {
        outcome.warnings.push(DistributionWarning::NoFood);
    }

    if victim.is_critical() {
        if camp.available_medical_kits > 0 {
            outcome.kits_granted = 1;
        } else {
            outcome
                .warnings
                .push(DistributionWarning::CriticalKitShortage);
        }
    } else if camp.available_medical_kits >= NORMAL_KIT_RESERVE_FLOOR {
        outcome.kits_granted = 1;
    }

    outcome
}

/// Plans one distribution and writes it through the given repositories.
///
/// Callers that need both writes to land together must pass repositories
/// bound to the same open transaction; see [`distribute_resources`].
pub fn apply_distribution<C, V>(
    camps: &C,
    victims: &V,
    victim: &Victim,
    camp: &Camp,
) -> RepoResult<DistributionOutcome>
where
    C: CampRepository + ?Sized,
    V: VictimRepository + ?Sized,
{
    let outcome = plan_distribution(victim, camp);

    camps.apply_camp_delta(camp.camp_id, &outcome.camp_delta())?;
    victims.apply_victim_delta(victim.victim_id, &outcome.victim_delta())?;

    for warning in &outcome.warnings {
        warn!(
            "event=distribution_shortage module=service camp_id={} victim_id={} warning={:?}",
            camp.camp_id, victim.victim_id, warning
        );
    }
    info!(
        "event=distribution module=service status=ok camp_id={} victim_id={} food={} kits={}",
        camp.camp_id, victim.victim_id, outcome.food_granted, outcome.kits_granted
    );

    Ok(outcome)
}

/// Runs one distribution inside its own immediate transaction.
///
/// Either both the camp stock and the victim counters change, or neither.
pub fn distribute_resources(
    conn: &mut Connection,
    victim: &Victim,
    camp: &Camp,
) -> RepoResult<DistributionOutcome> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let outcome = {
        let camps = SqliteCampRepository::new(&tx);
        let victims = SqliteVictimRepository::new(&tx);
        apply_distribution(&camps, &victims, victim, camp)?
    };
    tx.commit()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::{plan_distribution, DistributionWarning};
    use crate::model::camp::Camp;
    use crate::model::victim::{HealthCondition, Victim};

    fn camp(food: i64, kits: i64) -> Camp {
        Camp {
            camp_id: 7,
            location: "North Field".to_string(),
            max_capacity: 50,
            available_food: food,
            available_medical_kits: kits,
            volunteers: 4,
            current_occupancy: 10,
        }
    }

    fn victim(health_condition: HealthCondition) -> Victim {
        Victim {
            victim_id: 3,
            name: "Ravi".to_string(),
            age: 41,
            health_condition,
            assigned_camp_id: Some(7),
            food_distributed: 0,
            medical_kits_distributed: 0,
        }
    }

    #[test]
    fn grants_are_capped_at_one_each() {
        let outcome = plan_distribution(&victim(HealthCondition::Critical), &camp(500, 500));
        assert_eq!(outcome.food_granted, 1);
        assert_eq!(outcome.kits_granted, 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn empty_food_stock_warns() {
        let outcome = plan_distribution(&victim(HealthCondition::Normal), &camp(0, 5));
        assert_eq!(outcome.food_granted, 0);
        assert_eq!(outcome.warnings, vec![DistributionWarning::NoFood]);
    }

    #[test]
    fn critical_victim_takes_last_kit() {
        let outcome = plan_distribution(&victim(HealthCondition::Critical), &camp(1, 1));
        assert_eq!(outcome.kits_granted, 1);
    }

    #[test]
    fn critical_victim_without_kits_warns_after_food_warning() {
        let outcome = plan_distribution(&victim(HealthCondition::Critical), &camp(0, 0));
        assert!(outcome.is_empty());
        assert_eq!(
            outcome.warning_messages(),
            vec![
                "No food packets available in this camp.".to_string(),
                "CRITICAL victim - no medical kits available in camp!".to_string(),
            ]
        );
    }

    #[test]
    fn normal_victim_respects_reserve_floor_silently() {
        let at_floor = plan_distribution(&victim(HealthCondition::Normal), &camp(1, 1));
        assert_eq!(at_floor.kits_granted, 0);
        assert!(at_floor.warnings.is_empty());

        let above_floor = plan_distribution(&victim(HealthCondition::Normal), &camp(1, 2));
        assert_eq!(above_floor.kits_granted, 1);
    }
}
