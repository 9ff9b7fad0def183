//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and range queries over team-scoped `tasks` storage.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - List order is `date ASC` then insertion order, which is the order the
//!   aggregator treats as "first encountered".

use crate::model::task::{hhmm, ShiftType, Task, TaskCategory, TaskId};
use crate::model::team::{MemberId, TeamId};
use crate::repo::{
    bool_to_int, date_to_db, parse_db_date, parse_db_uuid, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    date,
    end_date,
    time,
    category,
    shift_type,
    assigned_to,
    completed,
    created_by
FROM tasks";

/// Filter for listing one team's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListQuery {
    pub team_id: TeamId,
    pub assigned_to: Option<MemberId>,
    /// Keeps tasks whose last day is on or after `from`.
    pub from: Option<NaiveDate>,
    /// Keeps tasks whose first day is on or before `to`.
    pub to: Option<NaiveDate>,
}

impl TaskListQuery {
    pub fn for_team(team_id: TeamId) -> Self {
        Self {
            team_id,
            assigned_to: None,
            from: None,
            to: None,
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn assigned_to(mut self, member_id: MemberId) -> Self {
        self.assigned_to = Some(member_id);
        self
    }
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    fn create_task(&self, team_id: TeamId, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Team that owns task `id`, if the task exists.
    fn task_team(&self, id: TaskId) -> RepoResult<Option<TeamId>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, team_id: TeamId, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                team_id,
                title,
                date,
                end_date,
                time,
                category,
                shift_type,
                assigned_to,
                completed,
                created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                task.id.to_string(),
                team_id.to_string(),
                task.title.as_str(),
                date_to_db(task.date),
                task.end_date.map(date_to_db),
                task.time.map(hhmm::format),
                task.category.as_str(),
                task.shift_type.map(ShiftType::as_str),
                task.assigned_to.to_string(),
                bool_to_int(task.completed),
                task.created_by.to_string(),
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                date = ?2,
                end_date = ?3,
                time = ?4,
                category = ?5,
                shift_type = ?6,
                assigned_to = ?7,
                completed = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?9;",
            params![
                task.title.as_str(),
                date_to_db(task.date),
                task.end_date.map(date_to_db),
                task.time.map(hhmm::format),
                task.category.as_str(),
                task.shift_type.map(ShiftType::as_str),
                task.assigned_to.to_string(),
                bool_to_int(task.completed),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn task_team(&self, id: TaskId) -> RepoResult<Option<TeamId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT team_id FROM tasks WHERE id = ?1;")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let team_text: String = row.get(0)?;
            return Ok(Some(parse_db_uuid(&team_text, "tasks.team_id")?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE team_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.team_id.to_string())];

        if let Some(member_id) = query.assigned_to {
            sql.push_str(" AND assigned_to = ?");
            bind_values.push(Value::Text(member_id.to_string()));
        }

        if let Some(from) = query.from {
            sql.push_str(" AND COALESCE(end_date, date) >= ?");
            bind_values.push(Value::Text(date_to_db(from)));
        }

        if let Some(to) = query.to {
            sql.push_str(" AND date <= ?");
            bind_values.push(Value::Text(date_to_db(to)));
        }

        sql.push_str(" ORDER BY date ASC, rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let date_text: String = row.get("date")?;

    let end_date = match row.get::<_, Option<String>>("end_date")? {
        Some(value) => Some(parse_db_date(&value, "tasks.end_date")?),
        None => None,
    };

    let time = match row.get::<_, Option<String>>("time")? {
        Some(value) => Some(hhmm::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid time `{value}` in tasks.time"))
        })?),
        None => None,
    };

    let category_text: String = row.get("category")?;
    let category = TaskCategory::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in tasks.category"
        ))
    })?;

    let shift_type = match row.get::<_, Option<String>>("shift_type")? {
        Some(value) => Some(ShiftType::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid shift type `{value}` in tasks.shift_type"))
        })?),
        None => None,
    };

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let assigned_text: String = row.get("assigned_to")?;
    let creator_text: String = row.get("created_by")?;

    let task = Task {
        id: parse_db_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        date: parse_db_date(&date_text, "tasks.date")?,
        end_date,
        time,
        category,
        shift_type,
        assigned_to: parse_db_uuid(&assigned_text, "tasks.assigned_to")?,
        completed,
        created_by: parse_db_uuid(&creator_text, "tasks.created_by")?,
    };
    task.validate()?;
    Ok(task)
}
