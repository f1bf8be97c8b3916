//! Command-line surface.
//!
//! # Responsibility
//! - Declare subcommands and flags for the relief boundary operations.
//! - Merge flag overrides into the environment-derived config.

use clap::{Args, Parser, Subcommand};
use relief_core::{CampId, HealthCondition, ReliefConfig, VictimId};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "relief",
    version,
    about = "Track relief camps, register victims and distribute supplies"
)]
pub struct Cli {
    /// SQLite database file (overrides RELIEF_DB_PATH).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Absolute directory for rolling log files (overrides RELIEF_LOG_DIR).
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error (overrides RELIEF_LOG_LEVEL).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Applies flag overrides on top of `base`.
    pub fn config(&self, base: ReliefConfig) -> ReliefConfig {
        let mut config = base;
        if let Some(db) = &self.db {
            config = config.with_db_path(db.clone());
        }
        if let Some(dir) = &self.log_dir {
            config = config.with_log_dir(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config = config.with_log_level(level.clone());
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage relief camps.
    #[command(subcommand)]
    Camp(CampCommand),
    /// Register and look up victims.
    #[command(subcommand)]
    Victim(VictimCommand),
    /// Run one manual distribution for a registered victim.
    Distribute { victim_id: VictimId },
    /// Print aggregate figures across all camps and victims.
    Report,
}

#[derive(Debug, Subcommand)]
pub enum CampCommand {
    /// Register a new camp.
    Add(AddCampArgs),
    /// List camps.
    List {
        /// Only camps that still have room.
        #[arg(long)]
        available: bool,
    },
    /// Show one camp and its victims.
    Show { camp_id: CampId },
}

#[derive(Debug, Args)]
pub struct AddCampArgs {
    #[arg(long)]
    pub location: String,
    #[arg(long, allow_negative_numbers = true)]
    pub capacity: i64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub food: i64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub kits: i64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub volunteers: i64,
}

#[derive(Debug, Subcommand)]
pub enum VictimCommand {
    /// Register a victim into a camp; the first distribution runs immediately.
    Register(RegisterVictimArgs),
    /// List all victims with their camp.
    List,
    /// Look up one victim by id.
    Show { victim_id: VictimId },
}

#[derive(Debug, Args)]
pub struct RegisterVictimArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, allow_negative_numbers = true)]
    pub age: i64,
    /// normal|critical
    #[arg(long, default_value = "normal", value_parser = parse_condition)]
    pub condition: HealthCondition,
    #[arg(long)]
    pub camp: CampId,
}

fn parse_condition(value: &str) -> Result<HealthCondition, String> {
    value.parse().map_err(|err: relief_core::VictimValidationError| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{CampCommand, Cli, Command, VictimCommand};
    use clap::Parser;
    use relief_core::{HealthCondition, ReliefConfig};
    use std::path::PathBuf;

    #[test]
    fn parses_camp_add_with_defaults() {
        let cli = Cli::try_parse_from([
            "relief",
            "camp",
            "add",
            "--location",
            "Harbor",
            "--capacity",
            "25",
        ])
        .unwrap();
        match cli.command {
            Command::Camp(CampCommand::Add(args)) => {
                assert_eq!(args.location, "Harbor");
                assert_eq!(args.capacity, 25);
                assert_eq!((args.food, args.kits, args.volunteers), (0, 0, 0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_victim_condition() {
        let cli = Cli::try_parse_from([
            "relief",
            "victim",
            "register",
            "--name",
            "Ira",
            "--age",
            "9",
            "--condition",
            "critical",
            "--camp",
            "2",
        ])
        .unwrap();
        match cli.command {
            Command::Victim(VictimCommand::Register(args)) => {
                assert_eq!(args.condition, HealthCondition::Critical);
                assert_eq!(args.camp, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_condition() {
        let result = Cli::try_parse_from([
            "relief",
            "victim",
            "register",
            "--name",
            "Ira",
            "--age",
            "9",
            "--condition",
            "stable",
            "--camp",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["relief", "--db", "/tmp/relief.db", "report", "--json"])
            .unwrap();
        let config = cli.config(ReliefConfig::default());
        assert_eq!(config.db_path, PathBuf::from("/tmp/relief.db"));
        assert!(cli.json);
    }
}
