//! Task use-case service.
//!
//! # Responsibility
//! - Create tasks for any assignee on the actor's team.
//! - Enforce creator-only completion toggle, edit and delete.
//! - Load the task window a calendar view needs.
//!
//! # Invariants
//! - A member has at most one shift task covering any given day; a second
//!   overlapping shift is rejected at write time.
//! - `id`, `created_by` and the owning team never change after creation.

use crate::model::task::{ShiftType, Task, TaskCategory, TaskId, TaskValidationError};
use crate::model::team::{MemberId, Team, TeamId};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use crate::schedule::projection::{view_range, ViewMode};
use chrono::{NaiveDate, NaiveTime};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    Validation(TaskValidationError),
    /// Actor or assignee is not on the team.
    NotTeamMember(MemberId),
    /// Only the creator may mutate a task.
    NotCreator { task_id: TaskId, actor: MemberId },
    TaskNotFound(TaskId),
    /// The assignee already has a shift on an overlapping day.
    ShiftConflict {
        assignee: MemberId,
        existing: TaskId,
    },
    /// An update tried to change an immutable field.
    ImmutableField(&'static str),
    /// The task is stored under a different team.
    ForeignTask { task_id: TaskId, team_id: TeamId },
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotTeamMember(id) => write!(f, "member {id} is not on this team"),
            Self::NotCreator { task_id, actor } => {
                write!(f, "member {actor} did not create task {task_id}")
            }
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::ShiftConflict { assignee, existing } => write!(
                f,
                "member {assignee} already has shift {existing} on an overlapping day"
            ),
            Self::ImmutableField(field) => write!(f, "task field `{field}` cannot change"),
            Self::ForeignTask { task_id, team_id } => {
                write!(f, "task {task_id} does not belong to team {team_id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::TaskValidation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Request model for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub category: TaskCategory,
    pub shift_type: Option<ShiftType>,
    pub assigned_to: MemberId,
}

impl TaskDraft {
    /// Draft for one shift slot, titled after the slot.
    pub fn shift(shift_type: ShiftType, date: NaiveDate, assigned_to: MemberId) -> Self {
        Self {
            title: shift_type.label().to_string(),
            date,
            end_date: None,
            time: None,
            category: TaskCategory::Work,
            shift_type: Some(shift_type),
            assigned_to,
        }
    }

    /// Draft for a non-shift task.
    pub fn personal(
        title: impl Into<String>,
        date: NaiveDate,
        category: TaskCategory,
        assigned_to: MemberId,
    ) -> Self {
        Self {
            title: title.into(),
            date,
            end_date: None,
            time: None,
            category,
            shift_type: None,
            assigned_to,
        }
    }

    fn into_task(self, created_by: MemberId) -> Result<Task, TaskValidationError> {
        let task = Task {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            date: self.date,
            end_date: self.end_date,
            time: self.time,
            category: self.category,
            shift_type: self.shift_type,
            assigned_to: self.assigned_to,
            completed: false,
            created_by,
        };
        task.validate()?;
        Ok(task)
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task authored by `actor` for an assignee on `team`.
    pub fn create_task(
        &self,
        team: &Team,
        actor: MemberId,
        draft: TaskDraft,
    ) -> Result<Task, TaskServiceError> {
        ensure_member(team, actor)?;
        ensure_member(team, draft.assigned_to)?;

        let task = draft.into_task(actor)?;
        self.ensure_no_shift_conflict(team, &task)?;
        self.repo.create_task(team.id, &task)?;

        info!(
            "event=task_create module=service status=ok is_shift={} span_days={}",
            task.is_shift(),
            (task.last_day() - task.date).num_days() + 1
        );
        Ok(task)
    }

    /// Replaces an existing task of `team`. Only its creator may do this,
    /// and the task stays on the team it was created for.
    pub fn update_task(
        &self,
        team: &Team,
        actor: MemberId,
        task: &Task,
    ) -> Result<(), TaskServiceError> {
        ensure_member(team, actor)?;
        let existing = self.load_owned(actor, task.id)?;
        if self.repo.task_team(task.id)? != Some(team.id) {
            warn!("event=task_mutate module=service status=denied reason=foreign_team");
            return Err(TaskServiceError::ForeignTask {
                task_id: task.id,
                team_id: team.id,
            });
        }
        if existing.created_by != task.created_by {
            return Err(TaskServiceError::ImmutableField("created_by"));
        }
        ensure_member(team, task.assigned_to)?;
        task.validate()?;
        self.ensure_no_shift_conflict(team, task)?;

        self.repo.update_task(task)?;
        Ok(())
    }

    /// Flips `completed`. Only the creator may do this.
    pub fn toggle_completed(
        &self,
        actor: MemberId,
        task_id: TaskId,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.load_owned(actor, task_id)?;
        task.completed = !task.completed;
        self.repo.update_task(&task)?;
        Ok(task)
    }

    /// Deletes a task. Only the creator may do this.
    pub fn delete_task(&self, actor: MemberId, task_id: TaskId) -> Result<(), TaskServiceError> {
        self.load_owned(actor, task_id)?;
        self.repo.delete_task(task_id)?;
        info!("event=task_delete module=service status=ok");
        Ok(())
    }

    pub fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(task_id)
    }

    /// Lists team tasks overlapping `[from, to]`, in aggregation order.
    pub fn list_range(
        &self,
        team: &Team,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<Task>> {
        self.repo
            .list_tasks(&TaskListQuery::for_team(team.id).between(from, to))
    }

    /// Loads exactly the tasks a `mode` view around `reference` can show.
    pub fn tasks_for_view(
        &self,
        team: &Team,
        reference: NaiveDate,
        mode: ViewMode,
    ) -> RepoResult<Vec<Task>> {
        let (from, to) = view_range(reference, mode);
        self.list_range(team, from, to)
    }

    fn load_owned(&self, actor: MemberId, task_id: TaskId) -> Result<Task, TaskServiceError> {
        let task = self
            .repo
            .get_task(task_id)?
            .ok_or(TaskServiceError::TaskNotFound(task_id))?;
        if task.created_by != actor {
            warn!("event=task_mutate module=service status=denied reason=not_creator");
            return Err(TaskServiceError::NotCreator { task_id, actor });
        }
        Ok(task)
    }

    fn ensure_no_shift_conflict(&self, team: &Team, task: &Task) -> Result<(), TaskServiceError> {
        if !task.is_shift() {
            return Ok(());
        }

        let query = TaskListQuery::for_team(team.id)
            .assigned_to(task.assigned_to)
            .between(task.date, task.last_day());
        let clash = self
            .repo
            .list_tasks(&query)?
            .into_iter()
            .find(|other| other.id != task.id && other.is_shift());

        match clash {
            Some(existing) => Err(TaskServiceError::ShiftConflict {
                assignee: task.assigned_to,
                existing: existing.id,
            }),
            None => Ok(()),
        }
    }
}

fn ensure_member(team: &Team, member_id: MemberId) -> Result<(), TaskServiceError> {
    if team.has_member(member_id) {
        Ok(())
    } else {
        Err(TaskServiceError::NotTeamMember(member_id))
    }
}
