//! Relief summary report.
//!
//! Aggregates are recomputed from the full record set on every call; nothing
//! is cached or persisted.

use crate::model::camp::{Camp, CampId};
use crate::model::victim::Victim;
use serde::{Deserialize, Serialize};

/// Occupancy line for one camp, in `camp_id` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampOccupancy {
    pub camp_id: CampId,
    pub location: String,
    pub current_occupancy: i64,
    pub max_capacity: i64,
    pub occupancy_percentage: f64,
    /// Places left before registration refuses this camp.
    pub remaining_capacity: i64,
}

/// Snapshot of relief operations across all camps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliefReport {
    pub total_camps: usize,
    pub total_victims: usize,
    pub total_food_distributed: i64,
    pub total_medical_kits_distributed: i64,
    pub critical_victims: usize,
    /// Camp with the highest occupancy; the lowest id wins ties.
    pub busiest_camp: Option<Camp>,
    pub camp_occupancy: Vec<CampOccupancy>,
}

impl ReliefReport {
    /// Builds the report from the current camp and victim records.
    pub fn from_records(camps: &[Camp], victims: &[Victim]) -> Self {
        let busiest_camp = camps
            .iter()
            .reduce(|best, candidate| {
                if candidate.current_occupancy > best.current_occupancy {
                    candidate
                } else {
                    best
                }
            })
            .cloned();

        Self {
            total_camps: camps.len(),
            total_victims: victims.len(),
            total_food_distributed: victims.iter().map(|v| v.food_distributed).sum(),
            total_medical_kits_distributed: victims
                .iter()
                .map(|v| v.medical_kits_distributed)
                .sum(),
            critical_victims: victims.iter().filter(|v| v.is_critical()).count(),
            busiest_camp,
            camp_occupancy: camps
                .iter()
                .map(|camp| CampOccupancy {
                    camp_id: camp.camp_id,
                    location: camp.location.clone(),
                    current_occupancy: camp.current_occupancy,
                    max_capacity: camp.max_capacity,
                    occupancy_percentage: camp.occupancy_percentage(),
                    remaining_capacity: camp.remaining_capacity(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReliefReport;
    use crate::model::camp::Camp;
    use crate::model::victim::{HealthCondition, Victim};

    fn camp(camp_id: i64, current_occupancy: i64) -> Camp {
        Camp {
            camp_id,
            location: format!("Camp {camp_id}"),
            max_capacity: 10,
            available_food: 0,
            available_medical_kits: 0,
            volunteers: 0,
            current_occupancy,
        }
    }

    #[test]
    fn empty_records_produce_zeroed_report() {
        let report = ReliefReport::from_records(&[], &[]);
        assert_eq!(report.total_camps, 0);
        assert_eq!(report.total_victims, 0);
        assert!(report.busiest_camp.is_none());
        assert!(report.camp_occupancy.is_empty());
    }

    #[test]
    fn busiest_camp_prefers_lowest_id_on_ties() {
        let camps = vec![camp(1, 2), camp(2, 5), camp(3, 5)];
        let report = ReliefReport::from_records(&camps, &[]);
        assert_eq!(report.busiest_camp.map(|c| c.camp_id), Some(2));
    }

    #[test]
    fn totals_sum_victim_counters() {
        let victims = vec![
            Victim {
                victim_id: 1,
                name: "Mei".to_string(),
                age: 8,
                health_condition: HealthCondition::Critical,
                assigned_camp_id: Some(1),
                food_distributed: 3,
                medical_kits_distributed: 2,
            },
            Victim {
                victim_id: 2,
                name: "Tomas".to_string(),
                age: 67,
                health_condition: HealthCondition::Normal,
                assigned_camp_id: Some(1),
                food_distributed: 1,
                medical_kits_distributed: 0,
            },
        ];
        let report = ReliefReport::from_records(&[camp(1, 2)], &victims);
        assert_eq!(report.total_food_distributed, 4);
        assert_eq!(report.total_medical_kits_distributed, 2);
        assert_eq!(report.critical_victims, 1);
        assert_eq!(report.camp_occupancy[0].occupancy_percentage, 20.0);
        assert_eq!(report.camp_occupancy[0].remaining_capacity, 8);
    }
}
