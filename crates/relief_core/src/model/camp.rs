//! Camp domain model.
//!
//! # Responsibility
//! - Define the persisted camp record and its derived occupancy views.
//! - Validate camp registration input before it reaches storage.
//!
//! # Invariants
//! - `camp_id` is assigned by storage and immutable afterwards.
//! - `current_occupancy <= max_capacity` is expected but not enforced here;
//!   registration refuses full camps instead.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned camp identity.
pub type CampId = i64;

/// Persisted relief camp with pooled consumable stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    pub camp_id: CampId,
    /// Human-readable site label.
    pub location: String,
    pub max_capacity: i64,
    /// Food packets still in stock.
    pub available_food: i64,
    /// Medical kits still in stock.
    pub available_medical_kits: i64,
    /// Informational headcount, never consumed by distribution.
    pub volunteers: i64,
    pub current_occupancy: i64,
}

impl Camp {
    /// Returns whether no further victim may be registered here.
    pub fn is_full(&self) -> bool {
        self.current_occupancy >= self.max_capacity
    }

    /// Occupancy as a percentage of capacity, rounded to one decimal.
    ///
    /// Returns `0.0` for a zero capacity instead of dividing by zero.
    pub fn occupancy_percentage(&self) -> f64 {
        if self.max_capacity == 0 {
            return 0.0;
        }
        let ratio = self.current_occupancy as f64 / self.max_capacity as f64;
        (ratio * 1000.0).round() / 10.0
    }

    /// Number of places left before the camp is full.
    pub fn remaining_capacity(&self) -> i64 {
        (self.max_capacity - self.current_occupancy).max(0)
    }
}

/// Registration input for a new camp.
///
/// Stock and volunteer counts default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCamp {
    pub location: String,
    pub max_capacity: i64,
    pub available_food: i64,
    pub available_medical_kits: i64,
    pub volunteers: i64,
}

impl NewCamp {
    /// Creates camp input with empty stock and no volunteers.
    pub fn new(location: impl Into<String>, max_capacity: i64) -> Self {
        Self {
            location: location.into(),
            max_capacity,
            available_food: 0,
            available_medical_kits: 0,
            volunteers: 0,
        }
    }

    pub fn with_food(mut self, available_food: i64) -> Self {
        self.available_food = available_food;
        self
    }

    pub fn with_medical_kits(mut self, available_medical_kits: i64) -> Self {
        self.available_medical_kits = available_medical_kits;
        self
    }

    pub fn with_volunteers(mut self, volunteers: i64) -> Self {
        self.volunteers = volunteers;
        self
    }

    /// Validates boundary rules for camp registration.
    ///
    /// # Errors
    /// - `EmptyLocation` when the trimmed location is empty.
    /// - `NonPositiveCapacity` when `max_capacity <= 0`.
    /// - `NegativeCount` when any stock or volunteer count is below zero.
    pub fn validate(&self) -> Result<(), CampValidationError> {
        if self.location.trim().is_empty() {
            return Err(CampValidationError::EmptyLocation);
        }
        if self.max_capacity <= 0 {
            return Err(CampValidationError::NonPositiveCapacity(self.max_capacity));
        }
        for (field, value) in [
            ("available_food", self.available_food),
            ("available_medical_kits", self.available_medical_kits),
            ("volunteers", self.volunteers),
        ] {
            if value < 0 {
                return Err(CampValidationError::NegativeCount { field, value });
            }
        }
        Ok(())
    }
}

/// Camp registration input rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampValidationError {
    EmptyLocation,
    NonPositiveCapacity(i64),
    NegativeCount { field: &'static str, value: i64 },
}

impl Display for CampValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLocation => write!(f, "location cannot be empty"),
            Self::NonPositiveCapacity(value) => {
                write!(f, "max_capacity must be a positive number, got {value}")
            }
            Self::NegativeCount { field, value } => {
                write!(f, "{field} cannot be negative, got {value}")
            }
        }
    }
}

impl Error for CampValidationError {}

#[cfg(test)]
mod tests {
    use super::{Camp, CampValidationError, NewCamp};

    fn camp(max_capacity: i64, current_occupancy: i64) -> Camp {
        Camp {
            camp_id: 1,
            location: "Riverside".to_string(),
            max_capacity,
            available_food: 0,
            available_medical_kits: 0,
            volunteers: 0,
            current_occupancy,
        }
    }

    #[test]
    fn is_full_at_or_above_capacity() {
        assert!(!camp(3, 2).is_full());
        assert!(camp(3, 3).is_full());
        assert!(camp(3, 4).is_full());
    }

    #[test]
    fn occupancy_percentage_rounds_to_one_decimal() {
        assert_eq!(camp(3, 1).occupancy_percentage(), 33.3);
        assert_eq!(camp(4, 4).occupancy_percentage(), 100.0);
    }

    #[test]
    fn occupancy_percentage_is_zero_for_zero_capacity() {
        assert_eq!(camp(0, 5).occupancy_percentage(), 0.0);
    }

    #[test]
    fn remaining_capacity_never_negative() {
        assert_eq!(camp(5, 2).remaining_capacity(), 3);
        assert_eq!(camp(2, 3).remaining_capacity(), 0);
    }

    #[test]
    fn validate_rejects_blank_location_and_bad_capacity() {
        assert_eq!(
            NewCamp::new("   ", 10).validate(),
            Err(CampValidationError::EmptyLocation)
        );
        assert_eq!(
            NewCamp::new("Hilltop", 0).validate(),
            Err(CampValidationError::NonPositiveCapacity(0))
        );
    }

    #[test]
    fn validate_rejects_negative_stock() {
        let err = NewCamp::new("Hilltop", 10)
            .with_medical_kits(-1)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            CampValidationError::NegativeCount {
                field: "available_medical_kits",
                value: -1,
            }
        );
    }
}
