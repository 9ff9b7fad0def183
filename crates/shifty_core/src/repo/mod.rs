//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for teams and tasks.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repository APIs return semantic errors (`*NotFound`, `InviteCodeTaken`)
//!   in addition to DB transport errors.

pub mod task_repo;
pub mod team_repo;

use crate::db::DbError;
use crate::model::task::{TaskId, TaskValidationError};
use crate::model::team::{MemberId, TeamId, TeamValidationError};
use chrono::NaiveDate;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for team/task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    TaskValidation(TaskValidationError),
    TeamValidation(TeamValidationError),
    Db(DbError),
    TaskNotFound(TaskId),
    TeamNotFound(TeamId),
    MemberNotFound(MemberId),
    DuplicateMember(MemberId),
    InviteCodeTaken(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskValidation(err) => write!(f, "{err}"),
            Self::TeamValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::TeamNotFound(id) => write!(f, "team not found: {id}"),
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::DuplicateMember(id) => write!(f, "member already exists: {id}"),
            Self::InviteCodeTaken(code) => write!(f, "invite code already in use: {code}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TaskValidation(err) => Some(err),
            Self::TeamValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::TaskValidation(value)
    }
}

impl From<TeamValidationError> for RepoError {
    fn from(value: TeamValidationError) -> Self {
        Self::TeamValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Returns whether `err` is a uniqueness violation on `target` (`table.column`).
pub(crate) fn is_unique_violation(err: &rusqlite::Error, target: &str) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message)) => {
            failure.code == ErrorCode::ConstraintViolation && message.contains(target)
        }
        _ => false,
    }
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_db_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn parse_db_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
