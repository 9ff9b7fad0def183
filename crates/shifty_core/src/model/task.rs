//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical schedule record shared by shift and personal tasks.
//! - Provide day-granular membership helpers used by aggregation.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `end_date`, when set, is not earlier than `date`.
//! - `shift_type` is only set on `TaskCategory::Work` tasks.
//! - Only `created_by` may toggle, edit or delete a task (enforced by services).

use crate::dto::TaskRecordDto;
use crate::model::team::MemberId;
use crate::schedule::range::is_active_on;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one task record.
pub type TaskId = Uuid;

/// Coarse bucket used for colouring and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Work,
    Personal,
    Health,
    Other,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [Self::Work, Self::Personal, Self::Health, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Health => "health",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim())
    }
}

/// Shift slot for work tasks. `Off` marks a scheduled day off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Day,
    Evening,
    Night,
    Off,
}

impl ShiftType {
    pub const ALL: [ShiftType; 4] = [Self::Day, Self::Evening, Self::Night, Self::Off];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Evening => "evening",
            Self::Night => "night",
            Self::Off => "off",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|shift| shift.as_str() == value.trim())
    }

    /// Default display title for a shift task.
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day shift",
            Self::Evening => "Evening shift",
            Self::Night => "Night shift",
            Self::Off => "Day off",
        }
    }
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    NilId,
    NilAssignee,
    NilCreator,
    BlankTitle,
    InvertedRange { date: NaiveDate, end_date: NaiveDate },
    ShiftOutsideWork { category: TaskCategory },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::NilAssignee => write!(f, "task assignee must not be nil"),
            Self::NilCreator => write!(f, "task creator must not be nil"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::InvertedRange { date, end_date } => {
                write!(f, "task end date {end_date} is earlier than start date {date}")
            }
            Self::ShiftOutsideWork { category } => write!(
                f,
                "shift type is only allowed on work tasks, got category `{}`",
                category.as_str()
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical schedule record.
///
/// Serde goes through [`TaskRecordDto`], so deserialized tasks are validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecordDto", into = "TaskRecordDto")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Start day.
    pub date: NaiveDate,
    /// Inclusive last day. `None` means a single-day task.
    pub end_date: Option<NaiveDate>,
    /// Time of day, independent of day membership.
    pub time: Option<NaiveTime>,
    pub category: TaskCategory,
    pub shift_type: Option<ShiftType>,
    pub assigned_to: MemberId,
    pub completed: bool,
    pub created_by: MemberId,
}

impl Task {
    /// Creates a single-day task with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        category: TaskCategory,
        assigned_to: MemberId,
        created_by: MemberId,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(
            Uuid::new_v4(),
            title,
            date,
            category,
            assigned_to,
            created_by,
        )
    }

    /// Creates a single-day task with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        date: NaiveDate,
        category: TaskCategory,
        assigned_to: MemberId,
        created_by: MemberId,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: title.into(),
            date,
            end_date: None,
            time: None,
            category,
            shift_type: None,
            assigned_to,
            completed: false,
            created_by,
        };
        task.validate()?;
        Ok(task)
    }

    /// Creates a work task for one shift slot, titled after the slot.
    pub fn shift(
        shift_type: ShiftType,
        date: NaiveDate,
        assigned_to: MemberId,
        created_by: MemberId,
    ) -> Result<Self, TaskValidationError> {
        let mut task = Self::new(
            shift_type.label(),
            date,
            TaskCategory::Work,
            assigned_to,
            created_by,
        )?;
        task.shift_type = Some(shift_type);
        Ok(task)
    }

    /// Extends the task to an inclusive multi-day span.
    pub fn ending_on(mut self, end_date: NaiveDate) -> Result<Self, TaskValidationError> {
        self.end_date = Some(end_date);
        self.validate()?;
        Ok(self)
    }

    /// Sets the time of day.
    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Inclusive last day of the task.
    pub fn last_day(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.date)
    }

    pub fn is_shift(&self) -> bool {
        self.shift_type.is_some()
    }

    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        is_active_on(day, self.date, self.end_date)
    }

    /// Returns whether any day of this task falls inside `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.date <= to && self.last_day() >= from
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.assigned_to.is_nil() {
            return Err(TaskValidationError::NilAssignee);
        }
        if self.created_by.is_nil() {
            return Err(TaskValidationError::NilCreator);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        if let Some(end_date) = self.end_date {
            if end_date < self.date {
                return Err(TaskValidationError::InvertedRange {
                    date: self.date,
                    end_date,
                });
            }
        }
        if self.shift_type.is_some() && self.category != TaskCategory::Work {
            return Err(TaskValidationError::ShiftOutsideWork {
                category: self.category,
            });
        }
        Ok(())
    }
}

/// `"HH:MM"` wire format for optional times of day.
pub(crate) mod hhmm {
    use chrono::NaiveTime;

    pub fn format(time: NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }

    pub fn parse(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
    }
}
