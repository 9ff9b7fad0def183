use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use shifty_core::db::open_db_in_memory;
use shifty_core::{
    RepoError, ShiftType, SqliteTaskRepository, SqliteTeamRepository, Task, TaskCategory,
    TaskListQuery, TaskRepository, Team, TeamMember, TeamRepository, TaskValidationError,
};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_team(conn: &Connection) -> Team {
    let ana = TeamMember::new("Ana", "RN", "#e57373", "ana@example.com").unwrap();
    let ben = TeamMember::new("Ben", "LPN", "#64b5f6", "ben@example.com").unwrap();
    let team = Team {
        id: Uuid::new_v4(),
        name: "Ward 7".to_string(),
        invite_code: "WARD07".to_string(),
        created_by: Some(ana.id),
        members: vec![ana, ben],
    };
    SqliteTeamRepository::new(conn).create_team(&team).unwrap();
    team
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let team = seeded_team(&conn);
    let repo = SqliteTaskRepository::new(&conn);
    let ana = team.members[0].id;

    let task = Task::new("Annual leave", day(2025, 6, 10), TaskCategory::Personal, ana, ana)
        .unwrap()
        .ending_on(day(2025, 6, 12))
        .unwrap()
        .at(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    let id = repo.create_task(team.id, &task).unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded, task);
    assert_eq!(repo.task_team(id).unwrap(), Some(team.id));
    assert_eq!(repo.task_team(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn update_changes_fields_and_missing_task_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let team = seeded_team(&conn);
    let repo = SqliteTaskRepository::new(&conn);
    let (ana, ben) = (team.members[0].id, team.members[1].id);

    let mut task = Task::shift(ShiftType::Day, day(2025, 6, 10), ana, ana).unwrap();
    repo.create_task(team.id, &task).unwrap();

    task.shift_type = Some(ShiftType::Evening);
    task.assigned_to = ben;
    task.completed = true;
    repo.update_task(&task).unwrap();
    assert_eq!(repo.get_task(task.id).unwrap().unwrap(), task);

    let ghost = Task::shift(ShiftType::Night, day(2025, 6, 10), ana, ana).unwrap();
    assert!(matches!(
        repo.update_task(&ghost),
        Err(RepoError::TaskNotFound(id)) if id == ghost.id
    ));
    assert!(matches!(
        repo.delete_task(ghost.id),
        Err(RepoError::TaskNotFound(_))
    ));
}

#[test]
fn range_query_keeps_overlapping_spans_in_date_then_insert_order() {
    let conn = open_db_in_memory().unwrap();
    let team = seeded_team(&conn);
    let repo = SqliteTaskRepository::new(&conn);
    let (ana, ben) = (team.members[0].id, team.members[1].id);

    let before = Task::new("May errand", day(2025, 5, 30), TaskCategory::Other, ana, ana).unwrap();
    let spanning = Task::new("Conference", day(2025, 5, 31), TaskCategory::Work, ben, ben)
        .unwrap()
        .ending_on(day(2025, 6, 2))
        .unwrap();
    let first_night = Task::shift(ShiftType::Night, day(2025, 6, 15), ana, ana).unwrap();
    let second_night = Task::shift(ShiftType::Night, day(2025, 6, 15), ben, ana).unwrap();
    let after = Task::new("July errand", day(2025, 7, 1), TaskCategory::Other, ana, ana).unwrap();
    for task in [&before, &second_night, &spanning, &after, &first_night] {
        repo.create_task(team.id, task).unwrap();
    }

    let june = repo
        .list_tasks(&TaskListQuery::for_team(team.id).between(day(2025, 6, 1), day(2025, 6, 30)))
        .unwrap();
    let ids: Vec<Uuid> = june.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![spanning.id, second_night.id, first_night.id]);

    let only_ana = repo
        .list_tasks(
            &TaskListQuery::for_team(team.id)
                .assigned_to(ana)
                .between(day(2025, 6, 1), day(2025, 6, 30)),
        )
        .unwrap();
    assert_eq!(only_ana, vec![first_night]);
}

#[test]
fn invalid_tasks_never_reach_storage() {
    let conn = open_db_in_memory().unwrap();
    let team = seeded_team(&conn);
    let repo = SqliteTaskRepository::new(&conn);
    let ana = team.members[0].id;

    let mut task = Task::new("Gym", day(2025, 6, 10), TaskCategory::Personal, ana, ana).unwrap();
    task.shift_type = Some(ShiftType::Day);

    assert!(matches!(
        repo.create_task(team.id, &task),
        Err(RepoError::TaskValidation(
            TaskValidationError::ShiftOutsideWork { .. }
        ))
    ));
    assert!(repo.get_task(task.id).unwrap().is_none());
}

#[test]
fn corrupted_rows_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let team = seeded_team(&conn);
    let repo = SqliteTaskRepository::new(&conn);
    let ana = team.members[0].id;

    let task = Task::new("Gym", day(2025, 6, 10), TaskCategory::Personal, ana, ana).unwrap();
    repo.create_task(team.id, &task).unwrap();
    conn.execute(
        "UPDATE tasks SET date = '10/06/2025' WHERE id = ?1;",
        [task.id.to_string()],
    )
    .unwrap();

    assert!(matches!(
        repo.get_task(task.id),
        Err(RepoError::InvalidData(_))
    ));
}
