//! Loosely-typed wire records and their conversion into the domain model.
//!
//! # Responsibility
//! - Mirror the camelCase JSON payload shape used by data-service responses
//!   and backup files.
//! - Convert payloads into validated `Task`/`TeamMember`/`Team` values at the
//!   boundary, rejecting malformed records instead of passing them inward.
//!
//! # Invariants
//! - Empty strings in optional fields are treated as absent.
//! - Dates accept `YYYY-MM-DD` and RFC 3339 timestamps (date part kept).

use crate::model::task::{hhmm, ShiftType, Task, TaskCategory, TaskValidationError};
use crate::model::team::{Team, TeamMember, TeamValidationError};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DtoError {
    InvalidField { field: &'static str, value: String },
    Task(TaskValidationError),
    Team(TeamValidationError),
}

impl Display for DtoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { field, value } => {
                write!(f, "invalid value `{value}` for field `{field}`")
            }
            Self::Task(err) => write!(f, "{err}"),
            Self::Team(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DtoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidField { .. } => None,
            Self::Task(err) => Some(err),
            Self::Team(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for DtoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Task(value)
    }
}

impl From<TeamValidationError> for DtoError {
    fn from(value: TeamValidationError) -> Self {
        Self::Team(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecordDto {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    pub category: String,
    #[serde(default)]
    pub shift_type: Option<String>,
    pub assigned_to: String,
    #[serde(default)]
    pub completed: bool,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub color: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    #[serde(default)]
    pub members: Vec<TeamMemberDto>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl TryFrom<TaskRecordDto> for Task {
    type Error = DtoError;

    fn try_from(dto: TaskRecordDto) -> Result<Self, Self::Error> {
        let category = TaskCategory::parse(&dto.category).ok_or(DtoError::InvalidField {
            field: "category",
            value: dto.category.clone(),
        })?;

        let shift_type = match present(dto.shift_type) {
            Some(value) => Some(ShiftType::parse(&value).ok_or(DtoError::InvalidField {
                field: "shiftType",
                value,
            })?),
            None => None,
        };

        let time = match present(dto.time) {
            Some(value) => Some(
                hhmm::parse(&value).ok_or(DtoError::InvalidField {
                    field: "time",
                    value,
                })?,
            ),
            None => None,
        };

        let end_date = match present(dto.end_date) {
            Some(value) => Some(parse_date("endDate", &value)?),
            None => None,
        };

        let task = Task {
            id: parse_uuid("id", &dto.id)?,
            title: dto.title,
            date: parse_date("date", &dto.date)?,
            end_date,
            time,
            category,
            shift_type,
            assigned_to: parse_uuid("assignedTo", &dto.assigned_to)?,
            completed: dto.completed,
            created_by: parse_uuid("createdBy", &dto.created_by)?,
        };
        task.validate()?;
        Ok(task)
    }
}

impl From<Task> for TaskRecordDto {
    fn from(value: Task) -> Self {
        Self::from(&value)
    }
}

impl From<&Task> for TaskRecordDto {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            date: task.date.to_string(),
            end_date: task.end_date.map(|day| day.to_string()),
            time: task.time.map(hhmm::format),
            category: task.category.as_str().to_string(),
            shift_type: task.shift_type.map(|shift| shift.as_str().to_string()),
            assigned_to: task.assigned_to.to_string(),
            completed: task.completed,
            created_by: task.created_by.to_string(),
        }
    }
}

impl TryFrom<TeamMemberDto> for TeamMember {
    type Error = DtoError;

    fn try_from(dto: TeamMemberDto) -> Result<Self, Self::Error> {
        let member = TeamMember {
            id: parse_uuid("id", &dto.id)?,
            name: dto.name,
            role: dto.role,
            color: dto.color,
            email: dto.email,
            avatar: present(dto.avatar),
        };
        member.validate()?;
        Ok(member)
    }
}

impl From<TeamMember> for TeamMemberDto {
    fn from(value: TeamMember) -> Self {
        Self::from(&value)
    }
}

impl From<&TeamMember> for TeamMemberDto {
    fn from(member: &TeamMember) -> Self {
        Self {
            id: member.id.to_string(),
            name: member.name.clone(),
            role: member.role.clone(),
            color: member.color.clone(),
            email: member.email.clone(),
            avatar: member.avatar.clone(),
        }
    }
}

impl TryFrom<TeamDto> for Team {
    type Error = DtoError;

    fn try_from(dto: TeamDto) -> Result<Self, Self::Error> {
        let members = dto
            .members
            .into_iter()
            .map(TeamMember::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let created_by = match present(dto.created_by) {
            Some(value) => Some(parse_uuid("createdBy", &value)?),
            None => None,
        };

        let team = Team {
            id: parse_uuid("id", &dto.id)?,
            name: dto.name,
            invite_code: dto.invite_code,
            members,
            created_by,
        };
        team.validate()?;
        Ok(team)
    }
}

impl From<Team> for TeamDto {
    fn from(value: Team) -> Self {
        Self::from(&value)
    }
}

impl From<&Team> for TeamDto {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.to_string(),
            name: team.name.clone(),
            invite_code: team.invite_code.clone(),
            members: team.members.iter().map(TeamMemberDto::from).collect(),
            created_by: team.created_by.map(|id| id.to_string()),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

fn parse_uuid(field: &'static str, value: &str) -> Result<Uuid, DtoError> {
    Uuid::parse_str(value.trim()).map_err(|_| DtoError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, DtoError> {
    let trimmed = value.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|moment| moment.date_naive())
        .map_err(|_| DtoError::InvalidField {
            field,
            value: value.to_string(),
        })
}
