//! Team/member repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist teams with their rosters and look them up by invite code.
//! - Own the member-removal cascade over `tasks.assigned_to`.
//!
//! # Invariants
//! - `teams.invite_code` is unique; collisions surface as `InviteCodeTaken`.
//! - Team creation and member removal run in a single transaction.
//! - Members are returned in join order.

use crate::model::team::{MemberId, Team, TeamId, TeamMember};
use crate::repo::{is_unique_violation, parse_db_uuid, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TEAM_SELECT_SQL: &str = "SELECT id, name, invite_code, created_by FROM teams";

const MEMBER_SELECT_SQL: &str = "SELECT id, name, role, color, email, avatar
FROM team_members";

/// Repository interface for team and roster persistence.
pub trait TeamRepository {
    /// Inserts the team and its initial roster.
    ///
    /// Returns `RepoError::InviteCodeTaken` when the invite code is in use.
    fn create_team(&self, team: &Team) -> RepoResult<TeamId>;
    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>>;
    fn find_team_by_invite_code(&self, code: &str) -> RepoResult<Option<Team>>;
    /// Updates team name and invite code.
    fn update_team(&self, team: &Team) -> RepoResult<()>;
    fn add_member(&self, team_id: TeamId, member: &TeamMember) -> RepoResult<()>;
    /// Removes a member and every task assigned to them; returns removed task count.
    fn remove_member(&self, team_id: TeamId, member_id: MemberId) -> RepoResult<usize>;
    fn list_members(&self, team_id: TeamId) -> RepoResult<Vec<TeamMember>>;
}

/// SQLite-backed team repository.
pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_team(&self, row_team: Option<TeamRow>) -> RepoResult<Option<Team>> {
        let Some(row_team) = row_team else {
            return Ok(None);
        };
        let members = self.list_members(row_team.id)?;
        let team = Team {
            id: row_team.id,
            name: row_team.name,
            invite_code: row_team.invite_code,
            members,
            created_by: row_team.created_by,
        };
        team.validate()?;
        Ok(Some(team))
    }

    fn query_team(&self, filter_sql: &str, value: String) -> RepoResult<Option<TeamRow>> {
        let raw = self
            .conn
            .query_row(
                &format!("{TEAM_SELECT_SQL} WHERE {filter_sql};"),
                [value],
                |row| {
                    Ok((
                        row.get::<_, String>("id")?,
                        row.get::<_, String>("name")?,
                        row.get::<_, String>("invite_code")?,
                        row.get::<_, Option<String>>("created_by")?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, invite_code, created_by)) = raw else {
            return Ok(None);
        };
        let created_by = match created_by {
            Some(value) => Some(parse_db_uuid(&value, "teams.created_by")?),
            None => None,
        };

        Ok(Some(TeamRow {
            id: parse_db_uuid(&id, "teams.id")?,
            name,
            invite_code,
            created_by,
        }))
    }
}

struct TeamRow {
    id: TeamId,
    name: String,
    invite_code: String,
    created_by: Option<MemberId>,
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn create_team(&self, team: &Team) -> RepoResult<TeamId> {
        team.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO teams (id, name, invite_code, created_by) VALUES (?1, ?2, ?3, ?4);",
            params![
                team.id.to_string(),
                team.name.as_str(),
                team.invite_code.as_str(),
                team.created_by.map(|id| id.to_string()),
            ],
        )
        .map_err(|err| {
            if is_unique_violation(&err, "teams.invite_code") {
                RepoError::InviteCodeTaken(team.invite_code.clone())
            } else {
                RepoError::from(err)
            }
        })?;

        for (join_order, member) in team.members.iter().enumerate() {
            insert_member(&tx, team.id, member, join_order as i64)?;
        }
        tx.commit()?;

        Ok(team.id)
    }

    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let row = self.query_team("id = ?1", id.to_string())?;
        self.load_team(row)
    }

    fn find_team_by_invite_code(&self, code: &str) -> RepoResult<Option<Team>> {
        let row = self.query_team("invite_code = ?1", code.to_string())?;
        self.load_team(row)
    }

    fn update_team(&self, team: &Team) -> RepoResult<()> {
        team.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE teams SET name = ?1, invite_code = ?2 WHERE id = ?3;",
                params![
                    team.name.as_str(),
                    team.invite_code.as_str(),
                    team.id.to_string()
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err, "teams.invite_code") {
                    RepoError::InviteCodeTaken(team.invite_code.clone())
                } else {
                    RepoError::from(err)
                }
            })?;

        if changed == 0 {
            return Err(RepoError::TeamNotFound(team.id));
        }

        Ok(())
    }

    fn add_member(&self, team_id: TeamId, member: &TeamMember) -> RepoResult<()> {
        member.validate()?;

        let team_exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM teams WHERE id = ?1);",
            [team_id.to_string()],
            |row| row.get(0),
        )?;
        if !team_exists {
            return Err(RepoError::TeamNotFound(team_id));
        }

        let next_order: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(join_order) + 1, 0) FROM team_members WHERE team_id = ?1;",
            [team_id.to_string()],
            |row| row.get(0),
        )?;

        insert_member(self.conn, team_id, member, next_order)
    }

    fn remove_member(&self, team_id: TeamId, member_id: MemberId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;

        let removed_member = tx.execute(
            "DELETE FROM team_members WHERE team_id = ?1 AND id = ?2;",
            params![team_id.to_string(), member_id.to_string()],
        )?;
        if removed_member == 0 {
            return Err(RepoError::MemberNotFound(member_id));
        }

        let removed_tasks = tx.execute(
            "DELETE FROM tasks WHERE team_id = ?1 AND assigned_to = ?2;",
            params![team_id.to_string(), member_id.to_string()],
        )?;
        tx.commit()?;

        info!(
            "event=member_remove module=repo status=ok removed_tasks={}",
            removed_tasks
        );
        Ok(removed_tasks)
    }

    fn list_members(&self, team_id: TeamId) -> RepoResult<Vec<TeamMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL}
             WHERE team_id = ?1
             ORDER BY join_order ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([team_id.to_string()])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }

        Ok(members)
    }
}

fn insert_member(
    conn: &Connection,
    team_id: TeamId,
    member: &TeamMember,
    join_order: i64,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO team_members (id, team_id, name, role, color, email, avatar, join_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        params![
            member.id.to_string(),
            team_id.to_string(),
            member.name.as_str(),
            member.role.as_str(),
            member.color.as_str(),
            member.email.as_str(),
            member.avatar.as_deref(),
            join_order,
        ],
    )
    .map_err(|err| {
        if is_unique_violation(&err, "team_members.id") {
            RepoError::DuplicateMember(member.id)
        } else {
            RepoError::from(err)
        }
    })?;
    Ok(())
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<TeamMember> {
    let id_text: String = row.get("id")?;
    let member = TeamMember {
        id: parse_db_uuid(&id_text, "team_members.id")?,
        name: row.get("name")?,
        role: row.get("role")?,
        color: row.get("color")?,
        email: row.get("email")?,
        avatar: row.get("avatar")?,
    };
    member.validate()?;
    Ok(member)
}
