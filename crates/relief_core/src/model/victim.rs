//! Victim domain model.
//!
//! # Responsibility
//! - Define the persisted victim record and health classification.
//! - Validate victim registration input before it reaches storage.
//!
//! # Invariants
//! - `assigned_camp_id` is set at registration and never reassigned.
//! - Distribution counters only grow through delta-updates.

use crate::model::camp::CampId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned victim identity.
pub type VictimId = i64;

/// Accepted age range for registration, inclusive.
pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 120;

/// Health triage used by the medical-kit priority rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCondition {
    Normal,
    /// Always served first when medical kits are scarce.
    Critical,
}

impl HealthCondition {
    /// Storage and wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Critical => "critical",
        }
    }

    /// Exact inverse of [`HealthCondition::as_str`]; no trimming.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "normal" => Some(Self::Normal),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl Display for HealthCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthCondition {
    type Err = VictimValidationError;

    /// Lenient parse for user input: surrounding whitespace is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::from_label(trimmed)
            .ok_or_else(|| VictimValidationError::UnknownHealthCondition(trimmed.to_string()))
    }
}

/// Persisted victim record with cumulative aid counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victim {
    pub victim_id: VictimId,
    pub name: String,
    pub age: i64,
    pub health_condition: HealthCondition,
    /// `None` only for rows written outside registration.
    pub assigned_camp_id: Option<CampId>,
    pub food_distributed: i64,
    pub medical_kits_distributed: i64,
}

impl Victim {
    pub fn is_critical(&self) -> bool {
        self.health_condition == HealthCondition::Critical
    }
}

/// Registration input for a new victim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVictim {
    pub name: String,
    pub age: i64,
    pub health_condition: HealthCondition,
    pub camp_id: CampId,
}

impl NewVictim {
    pub fn new(
        name: impl Into<String>,
        age: i64,
        health_condition: HealthCondition,
        camp_id: CampId,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            health_condition,
            camp_id,
        }
    }

    /// Validates boundary rules for victim registration.
    ///
    /// Camp existence and capacity are checked by the registration service,
    /// which has to read the camp anyway.
    pub fn validate(&self) -> Result<(), VictimValidationError> {
        if self.name.trim().is_empty() {
            return Err(VictimValidationError::EmptyName);
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(VictimValidationError::AgeOutOfRange(self.age));
        }
        Ok(())
    }
}

/// Victim registration input rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VictimValidationError {
    EmptyName,
    AgeOutOfRange(i64),
    UnknownHealthCondition(String),
}

impl Display for VictimValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::AgeOutOfRange(age) => {
                write!(f, "age must be between {MIN_AGE} and {MAX_AGE}, got {age}")
            }
            Self::UnknownHealthCondition(value) => write!(
                f,
                "health condition must be `normal` or `critical`, got `{value}`"
            ),
        }
    }
}

impl Error for VictimValidationError {}
