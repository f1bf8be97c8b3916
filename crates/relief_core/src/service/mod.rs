//! Core use-case services.
//!
//! # Responsibility
//! - Own the distribution rule and apply it through the repositories.
//! - Orchestrate registration, manual distribution and reporting for
//!   boundary callers (CLI or any other front end).

pub mod distribution;
pub mod relief_service;
pub mod report;
