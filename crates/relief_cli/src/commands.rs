//! Command execution and output rendering.
//!
//! # Responsibility
//! - Map parsed subcommands onto `ReliefService` calls.
//! - Render results as plain text or JSON.
//!
//! # Invariants
//! - Distribution warnings are part of a successful result, never an error.

use crate::cli::{AddCampArgs, CampCommand, Command, RegisterVictimArgs, VictimCommand};
use relief_core::db::DbError;
use relief_core::{
    Camp, DistributionReceipt, NewCamp, NewVictim, ReliefReport, ReliefService, ServiceError,
    Victim,
};
use serde::Serialize;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter, Write};

/// Top-level failure for one CLI invocation.
#[derive(Debug)]
pub enum CliError {
    Logging(String),
    Db(DbError),
    Service(ServiceError),
    Render(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Db(err) => write!(f, "database open failed: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "failed to render output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<relief_core::RepoError> for CliError {
    fn from(value: relief_core::RepoError) -> Self {
        Self::Service(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}

/// Runs one subcommand and returns the text to print on stdout.
pub fn execute(
    command: &Command,
    service: &mut ReliefService<'_>,
    as_json: bool,
) -> Result<String, CliError> {
    match command {
        Command::Camp(CampCommand::Add(args)) => add_camp(service, args, as_json),
        Command::Camp(CampCommand::List { available }) => {
            let camps = if *available {
                service.list_available_camps()?
            } else {
                service.list_camps()?
            };
            if as_json {
                return to_json(&camps);
            }
            Ok(render_camps(&camps))
        }
        Command::Camp(CampCommand::Show { camp_id }) => {
            let detail = service
                .camp_detail(*camp_id)?
                .ok_or(ServiceError::CampNotFound(*camp_id))?;
            if as_json {
                return to_json(&detail);
            }
            let mut out = render_camps(std::slice::from_ref(&detail.camp));
            out.push('\n');
            out.push_str(&render_victims(detail.victims.iter().map(|v| (v, None))));
            Ok(out)
        }
        Command::Victim(VictimCommand::Register(args)) => register_victim(service, args, as_json),
        Command::Victim(VictimCommand::List) => {
            let roster = service.victim_roster()?;
            if as_json {
                return to_json(&roster);
            }
            Ok(render_victims(
                roster
                    .iter()
                    .map(|entry| (&entry.victim, entry.camp_location.as_deref())),
            ))
        }
        Command::Victim(VictimCommand::Show { victim_id }) => {
            let lookup = service
                .find_victim(*victim_id)?
                .ok_or(ServiceError::VictimNotFound(*victim_id))?;
            if as_json {
                return to_json(&lookup);
            }
            let location = lookup.camp.as_ref().map(|camp| camp.location.as_str());
            Ok(render_victims(std::iter::once((&lookup.victim, location))))
        }
        Command::Distribute { victim_id } => {
            let receipt = service.distribute_to_victim(*victim_id)?;
            if as_json {
                return to_json(&receipt);
            }
            Ok(render_distribution(&receipt))
        }
        Command::Report => {
            let report = service.report()?;
            if as_json {
                return to_json(&report);
            }
            Ok(render_report(&report))
        }
    }
}

fn add_camp(
    service: &ReliefService<'_>,
    args: &AddCampArgs,
    as_json: bool,
) -> Result<String, CliError> {
    let camp = NewCamp::new(args.location.clone(), args.capacity)
        .with_food(args.food)
        .with_medical_kits(args.kits)
        .with_volunteers(args.volunteers);
    let camp_id = service.create_camp(&camp)?;
    if as_json {
        return to_json(&json!({ "camp_id": camp_id }));
    }
    Ok(format!(
        "Camp at '{}' registered successfully! (ID: {camp_id})",
        camp.location.trim()
    ))
}

fn register_victim(
    service: &mut ReliefService<'_>,
    args: &RegisterVictimArgs,
    as_json: bool,
) -> Result<String, CliError> {
    let victim = NewVictim::new(args.name.clone(), args.age, args.condition, args.camp);
    let receipt = service.register_victim(&victim)?;
    if as_json {
        return to_json(&receipt);
    }

    let mut out = format!(
        "Victim '{}' registered! (ID: {}) | Food: {} | Med Kits: {}",
        receipt.victim_name,
        receipt.victim_id,
        receipt.outcome.food_granted,
        receipt.outcome.kits_granted
    );
    push_warnings(&mut out, &receipt);
    Ok(out)
}

fn render_distribution(receipt: &DistributionReceipt) -> String {
    let mut out = if receipt.outcome.is_empty() {
        "Nothing distributed - camp resources may be depleted.".to_string()
    } else {
        format!(
            "Distributed to {}: {} food packet(s), {} medical kit(s).",
            receipt.victim_name, receipt.outcome.food_granted, receipt.outcome.kits_granted
        )
    };
    push_warnings(&mut out, receipt);
    out
}

fn push_warnings(out: &mut String, receipt: &DistributionReceipt) {
    for message in receipt.outcome.warning_messages() {
        out.push_str("\nwarning: ");
        out.push_str(&message);
    }
}

fn render_camps(camps: &[Camp]) -> String {
    if camps.is_empty() {
        return "No camps registered.".to_string();
    }
    let mut out = String::from("ID\tLOCATION\tOCCUPANCY\tFREE\tFOOD\tKITS\tVOLUNTEERS");
    for camp in camps {
        let _ = write!(
            out,
            "\n{}\t{}\t{}/{} ({}%)\t{}\t{}\t{}\t{}",
            camp.camp_id,
            camp.location,
            camp.current_occupancy,
            camp.max_capacity,
            camp.occupancy_percentage(),
            if camp.is_full() {
                "FULL".to_string()
            } else {
                camp.remaining_capacity().to_string()
            },
            camp.available_food,
            camp.available_medical_kits,
            camp.volunteers
        );
    }
    out
}

fn render_victims<'a>(rows: impl Iterator<Item = (&'a Victim, Option<&'a str>)>) -> String {
    let mut out = String::from("ID\tNAME\tAGE\tCONDITION\tCAMP\tFOOD\tKITS");
    let mut any = false;
    for (victim, location) in rows {
        any = true;
        let camp = match (victim.assigned_camp_id, location) {
            (Some(id), Some(location)) => format!("{id} ({location})"),
            (Some(id), None) => id.to_string(),
            (None, _) => "-".to_string(),
        };
        let _ = write!(
            out,
            "\n{}\t{}\t{}\t{}\t{}\t{}\t{}",
            victim.victim_id,
            victim.name,
            victim.age,
            victim.health_condition,
            camp,
            victim.food_distributed,
            victim.medical_kits_distributed
        );
    }
    if !any {
        return "No victims registered.".to_string();
    }
    out
}

fn render_report(report: &ReliefReport) -> String {
    let mut out = format!(
        "Camps: {}\nVictims: {} ({} critical)\nFood distributed: {}\nMedical kits distributed: {}",
        report.total_camps,
        report.total_victims,
        report.critical_victims,
        report.total_food_distributed,
        report.total_medical_kits_distributed
    );
    match &report.busiest_camp {
        Some(camp) => {
            let _ = write!(
                out,
                "\nBusiest camp: {} ({}/{})",
                camp.location, camp.current_occupancy, camp.max_capacity
            );
        }
        None => out.push_str("\nBusiest camp: -"),
    }
    for line in &report.camp_occupancy {
        let _ = write!(
            out,
            "\n  {}: {}/{} ({}%, {} free)",
            line.location,
            line.current_occupancy,
            line.max_capacity,
            line.occupancy_percentage,
            line.remaining_capacity
        );
    }
    out
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::{execute, CliError};
    use crate::cli::{AddCampArgs, CampCommand, Command, RegisterVictimArgs, VictimCommand};
    use relief_core::db::open_db;
    use relief_core::{HealthCondition, ReliefService, ServiceError};

    fn add_camp(location: &str, capacity: i64, food: i64, kits: i64) -> Command {
        Command::Camp(CampCommand::Add(AddCampArgs {
            location: location.to_string(),
            capacity,
            food,
            kits,
            volunteers: 2,
        }))
    }

    fn register(name: &str, condition: HealthCondition, camp: i64) -> Command {
        Command::Victim(VictimCommand::Register(RegisterVictimArgs {
            name: name.to_string(),
            age: 30,
            condition,
            camp,
        }))
    }

    #[test]
    fn register_then_distribute_prints_grants_and_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = open_db(dir.path().join("relief.db")).unwrap();
        let mut service = ReliefService::new(&mut conn);

        let created = execute(&add_camp("Harbor", 3, 1, 1), &mut service, false).unwrap();
        assert_eq!(created, "Camp at 'Harbor' registered successfully! (ID: 1)");

        let registered = execute(
            &register("Kai", HealthCondition::Critical, 1),
            &mut service,
            false,
        )
        .unwrap();
        assert_eq!(
            registered,
            "Victim 'Kai' registered! (ID: 1) | Food: 1 | Med Kits: 1"
        );

        let distributed =
            execute(&Command::Distribute { victim_id: 1 }, &mut service, false).unwrap();
        assert!(distributed.starts_with("Nothing distributed"));
        assert!(distributed.contains("warning: No food packets available in this camp."));
        assert!(distributed.contains("warning: CRITICAL victim"));
    }

    #[test]
    fn report_renders_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = open_db(dir.path().join("relief.db")).unwrap();
        let mut service = ReliefService::new(&mut conn);
        execute(&add_camp("Harbor", 3, 5, 5), &mut service, false).unwrap();
        execute(
            &register("Kai", HealthCondition::Normal, 1),
            &mut service,
            false,
        )
        .unwrap();

        let output = execute(&Command::Report, &mut service, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total_camps"], 1);
        assert_eq!(value["total_food_distributed"], 1);
        assert_eq!(value["busiest_camp"]["location"], "Harbor");
    }

    #[test]
    fn full_camp_surfaces_service_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = open_db(dir.path().join("relief.db")).unwrap();
        let mut service = ReliefService::new(&mut conn);
        execute(&add_camp("Tiny", 1, 0, 0), &mut service, false).unwrap();
        execute(
            &register("First", HealthCondition::Normal, 1),
            &mut service,
            false,
        )
        .unwrap();

        let err = execute(
            &register("Second", HealthCondition::Normal, 1),
            &mut service,
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Service(ServiceError::CampFull { .. })
        ));
        assert!(err.to_string().contains("is full (1/1)"));
    }

    #[test]
    fn camp_list_shows_free_places_and_full_marker() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = open_db(dir.path().join("relief.db")).unwrap();
        let mut service = ReliefService::new(&mut conn);
        execute(&add_camp("Roomy", 4, 0, 0), &mut service, false).unwrap();
        execute(&add_camp("Tiny", 1, 0, 0), &mut service, false).unwrap();
        execute(
            &register("Lone", HealthCondition::Normal, 2),
            &mut service,
            false,
        )
        .unwrap();

        let listing = execute(
            &Command::Camp(CampCommand::List { available: false }),
            &mut service,
            false,
        )
        .unwrap();
        let rows = listing.lines().skip(1).collect::<Vec<_>>();
        assert_eq!(rows[0], "1\tRoomy\t0/4 (0%)\t4\t0\t0\t2");
        assert_eq!(rows[1], "2\tTiny\t1/1 (100%)\tFULL\t0\t0\t2");

        let report = execute(&Command::Report, &mut service, false).unwrap();
        assert!(report.contains("Roomy: 0/4 (0%, 4 free)"));
    }

    #[test]
    fn missing_camp_detail_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = open_db(dir.path().join("relief.db")).unwrap();
        let mut service = ReliefService::new(&mut conn);

        let err = execute(
            &Command::Camp(CampCommand::Show { camp_id: 8 }),
            &mut service,
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Service(ServiceError::CampNotFound(8))
        ));
    }
}
