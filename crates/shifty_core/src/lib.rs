//! Core scheduling logic for Shifty.
//! Team membership, shift tasks and the calendar projections built from them.

pub mod config;
pub mod db;
pub mod dto;
pub mod export;
pub mod invite;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use config::CoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use dto::{DtoError, TaskRecordDto, TeamDto, TeamMemberDto};
pub use export::backup::{export_backup, import_backup, Backup, BackupError};
pub use export::ics::export_ics;
pub use invite::{generate_invite_code, is_valid_invite_code, normalize_invite_code};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::task::{ShiftType, Task, TaskCategory, TaskId, TaskValidationError};
pub use model::team::{MemberId, Team, TeamId, TeamMember, TeamValidationError};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::team_repo::{SqliteTeamRepository, TeamRepository};
pub use repo::{RepoError, RepoResult};
pub use schedule::aggregate::{aggregate_day, MemberDaySchedule, MemberFilter};
pub use schedule::projection::{
    project, project_month, project_week, project_year, view_range, MonthCell, MonthView,
    ViewMode, ViewModel, WeekView, YearView,
};
pub use schedule::range::is_active_on;
pub use service::task_service::{TaskDraft, TaskService, TaskServiceError};
pub use service::team_service::{TeamService, TeamServiceError};

/// Health-check probe for embedding shells.
pub fn ping() -> &'static str {
    "pong"
}

/// Version of this crate.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_answers() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_matches_manifest() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }
}
