//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `shifty_core` linkage and storage bootstrap end to end.
//! - Print a month grid for an optional `YYYY-MM-DD` reference date.
//!
//! # Invariants
//! - Unknown flags and extra arguments are rejected with the usage line.

use chrono::{Local, NaiveDate};
use shifty_core::{
    open_db_in_memory, project_month, CoreConfig, MemberFilter, MonthCell, ShiftType,
    SqliteTaskRepository, SqliteTeamRepository, TaskDraft, TaskService, TeamMember, TeamService,
    ViewMode,
};
use std::error::Error;
use std::process::ExitCode;

const USAGE: &str = "usage: shifty_cli [YYYY-MM-DD]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    /// Month grid around the date, or today when absent.
    Month(Option<NaiveDate>),
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args {
        [] => Ok(Command::Month(None)),
        [flag] if flag == "-h" || flag == "--help" => Ok(Command::Help),
        [flag] if flag.starts_with('-') => Err(format!("unknown option `{flag}`")),
        [raw] => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(|date| Command::Month(Some(date)))
            .map_err(|err| format!("invalid date `{raw}`: {err}")),
        [_, extra, ..] => Err(format!("unexpected argument `{extra}`")),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let reference = match parse_args(&args) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Command::Month(date)) => date.unwrap_or_else(|| Local::now().date_naive()),
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    println!("shifty_core ping={}", shifty_core::ping());
    println!("shifty_core version={}", shifty_core::core_version());

    match run(reference) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(reference: NaiveDate) -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env();
    if shifty_core::init_from_config(&config)? {
        println!("logging level={}", config.log_level);
    }

    // Throwaway in-memory store seeded with a two-person team.
    let conn = open_db_in_memory()?;
    let teams = TeamService::with_invite_code_attempts(
        SqliteTeamRepository::new(&conn),
        config.invite_code_attempts,
    );
    let ana = TeamMember::new("Ana", "RN", "#e57373", "ana@example.com")?;
    let ben = TeamMember::new("Ben", "RN", "#64b5f6", "ben@example.com")?;
    let (ana_id, ben_id) = (ana.id, ben.id);
    let created = teams.create_team("Demo ward", ana)?;
    let team = teams.join_team(&created.invite_code.to_lowercase(), ben)?;
    println!("team invite_code={} members={}", team.invite_code, team.members.len());

    let tasks = TaskService::new(SqliteTaskRepository::new(&conn));
    tasks.create_task(&team, ana_id, TaskDraft::shift(ShiftType::Day, reference, ana_id))?;
    tasks.create_task(&team, ana_id, TaskDraft::shift(ShiftType::Night, reference, ben_id))?;

    let loaded = tasks.tasks_for_view(&team, reference, ViewMode::Month)?;
    let month = project_month(&loaded, reference, &team.member_ids(), MemberFilter::All);
    println!("month {}-{:02}", month.year, month.month);
    print_grid(&month.cells);
    Ok(())
}

fn print_grid(cells: &[MonthCell<'_>]) {
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");
    for week in cells.chunks(7) {
        let line: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                MonthCell::Blank => "   ".to_string(),
                MonthCell::Day(column) => {
                    let busy = column.members.iter().any(|member| !member.is_empty());
                    format!("{}{}", column.date.format("%e"), if busy { '*' } else { ' ' })
                }
            })
            .collect();
        println!("{}", line.join(" "));
    }
}
