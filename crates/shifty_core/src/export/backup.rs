//! Versioned JSON backup of one team and its tasks.
//!
//! # Invariants
//! - Backups carry `version`; newer versions are rejected, never guessed.
//! - Every imported record passes the same validation as live writes.
//! - Imported tasks must be assigned to a member listed in the backup.

use crate::dto::{DtoError, TaskRecordDto, TeamDto};
use crate::model::task::{Task, TaskId};
use crate::model::team::Team;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug)]
pub enum BackupError {
    Json(serde_json::Error),
    UnsupportedVersion(u32),
    Team(DtoError),
    Task { index: usize, source: DtoError },
    UnknownAssignee(TaskId),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed backup json: {err}"),
            Self::UnsupportedVersion(version) => write!(
                f,
                "backup version {version} is newer than supported {BACKUP_VERSION}"
            ),
            Self::Team(err) => write!(f, "invalid team record: {err}"),
            Self::Task { index, source } => write!(f, "invalid task record #{index}: {source}"),
            Self::UnknownAssignee(id) => {
                write!(f, "task {id} is assigned to a member missing from the backup")
            }
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Team(err) => Some(err),
            Self::Task { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackupFile {
    version: u32,
    exported_at: String,
    team: TeamDto,
    tasks: Vec<TaskRecordDto>,
}

/// Decoded backup contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    /// RFC 3339 export timestamp as written by the exporter.
    pub exported_at: String,
    pub team: Team,
    pub tasks: Vec<Task>,
}

/// Serializes `team` and `tasks` as pretty-printed JSON.
pub fn export_backup(team: &Team, tasks: &[Task]) -> Result<String, BackupError> {
    let file = BackupFile {
        version: BACKUP_VERSION,
        exported_at: Utc::now().to_rfc3339(),
        team: TeamDto::from(team),
        tasks: tasks.iter().map(TaskRecordDto::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Parses and validates a backup produced by [`export_backup`].
pub fn import_backup(json: &str) -> Result<Backup, BackupError> {
    let file: BackupFile = serde_json::from_str(json)?;
    if file.version > BACKUP_VERSION {
        return Err(BackupError::UnsupportedVersion(file.version));
    }

    let team = Team::try_from(file.team).map_err(BackupError::Team)?;

    let mut tasks = Vec::with_capacity(file.tasks.len());
    for (index, record) in file.tasks.into_iter().enumerate() {
        let task = Task::try_from(record).map_err(|source| BackupError::Task { index, source })?;
        if !team.has_member(task.assigned_to) {
            return Err(BackupError::UnknownAssignee(task.id));
        }
        tasks.push(task);
    }

    Ok(Backup {
        exported_at: file.exported_at,
        team,
        tasks,
    })
}
