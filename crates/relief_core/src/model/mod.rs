//! Typed domain records for relief camps and victims.
//!
//! # Responsibility
//! - Define the row shapes read from and written to storage.
//! - Own boundary validation for camp and victim registration input.
//!
//! # Invariants
//! - Identities are assigned by storage and never change afterwards.
//! - Records are never deleted; victims are never reassigned.

pub mod camp;
pub mod victim;
