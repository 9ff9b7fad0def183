//! Team use-case service.
//!
//! # Responsibility
//! - Create teams with a reserved unique invite code.
//! - Join teams by (normalized) invite code.
//! - Remove members together with their tasks.
//!
//! # Invariants
//! - Invite code reservation is bounded by `invite_code_attempts`.
//! - A member can be removed only by themselves or by the team creator.

use crate::invite::{
    is_valid_invite_code, normalize_invite_code, reserve_unique_code, InviteCodeError,
    Reservation, DEFAULT_INVITE_CODE_ATTEMPTS,
};
use crate::model::team::{MemberId, Team, TeamId, TeamMember, TeamValidationError};
use crate::repo::team_repo::TeamRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for team use-cases.
#[derive(Debug)]
pub enum TeamServiceError {
    Validation(TeamValidationError),
    /// Join input is not a well-formed invite code.
    InvalidInviteCode(String),
    /// No team uses this invite code.
    UnknownInviteCode(String),
    /// Every generated code collided with an existing one.
    InviteCodesExhausted { attempts: u32 },
    TeamNotFound(TeamId),
    AlreadyMember(MemberId),
    NotTeamMember(MemberId),
    NotAuthorized { actor: MemberId },
    Repo(RepoError),
}

impl Display for TeamServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidInviteCode(code) => write!(f, "invalid invite code `{code}`"),
            Self::UnknownInviteCode(code) => write!(f, "no team uses invite code `{code}`"),
            Self::InviteCodesExhausted { attempts } => {
                write!(f, "no unique invite code found after {attempts} attempts")
            }
            Self::TeamNotFound(id) => write!(f, "team not found: {id}"),
            Self::AlreadyMember(id) => write!(f, "member {id} already belongs to a team"),
            Self::NotTeamMember(id) => write!(f, "member {id} is not on this team"),
            Self::NotAuthorized { actor } => {
                write!(f, "member {actor} is not allowed to change this team")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TeamServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TeamServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TeamNotFound(id) => Self::TeamNotFound(id),
            RepoError::MemberNotFound(id) => Self::NotTeamMember(id),
            RepoError::DuplicateMember(id) => Self::AlreadyMember(id),
            RepoError::TeamValidation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TeamValidationError> for TeamServiceError {
    fn from(value: TeamValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<InviteCodeError<RepoError>> for TeamServiceError {
    fn from(value: InviteCodeError<RepoError>) -> Self {
        match value {
            InviteCodeError::Exhausted { attempts } => Self::InviteCodesExhausted { attempts },
            InviteCodeError::Store(err) => Self::from(err),
        }
    }
}

/// Team service facade over repository implementations.
pub struct TeamService<R: TeamRepository> {
    repo: R,
    invite_code_attempts: u32,
}

impl<R: TeamRepository> TeamService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_invite_code_attempts(repo, DEFAULT_INVITE_CODE_ATTEMPTS)
    }

    pub fn with_invite_code_attempts(repo: R, invite_code_attempts: u32) -> Self {
        Self {
            repo,
            invite_code_attempts: invite_code_attempts.max(1),
        }
    }

    /// Creates a team whose first member is `creator`.
    pub fn create_team(
        &self,
        name: impl Into<String>,
        creator: TeamMember,
    ) -> Result<Team, TeamServiceError> {
        creator.validate()?;
        let mut team = Team {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            invite_code: String::new(),
            created_by: Some(creator.id),
            members: vec![creator],
        };

        reserve_unique_code(self.invite_code_attempts, |candidate| {
            team.invite_code = candidate.to_string();
            match self.repo.create_team(&team) {
                Ok(_) => Ok(Reservation::Reserved),
                Err(RepoError::InviteCodeTaken(_)) => Ok(Reservation::Taken),
                Err(err) => Err(err),
            }
        })?;

        info!(
            "event=team_create module=service status=ok members={}",
            team.members.len()
        );
        Ok(team)
    }

    /// Appends `member` to the team owning `invite_code`.
    pub fn join_team(
        &self,
        invite_code: &str,
        member: TeamMember,
    ) -> Result<Team, TeamServiceError> {
        let code = normalize_invite_code(invite_code);
        if !is_valid_invite_code(&code) {
            return Err(TeamServiceError::InvalidInviteCode(code));
        }

        let team = self
            .repo
            .find_team_by_invite_code(&code)?
            .ok_or_else(|| TeamServiceError::UnknownInviteCode(code.clone()))?;
        if team.has_member(member.id) {
            return Err(TeamServiceError::AlreadyMember(member.id));
        }

        self.repo.add_member(team.id, &member)?;
        info!("event=team_join module=service status=ok");
        self.load_team(team.id)
    }

    /// Removes `member_id` and every task assigned to them.
    ///
    /// Returns the number of removed tasks.
    pub fn remove_member(
        &self,
        team_id: TeamId,
        actor: MemberId,
        member_id: MemberId,
    ) -> Result<usize, TeamServiceError> {
        let team = self.load_team(team_id)?;
        if !team.has_member(member_id) {
            return Err(TeamServiceError::NotTeamMember(member_id));
        }
        if actor != member_id && team.created_by != Some(actor) {
            warn!("event=member_remove module=service status=denied reason=not_creator");
            return Err(TeamServiceError::NotAuthorized { actor });
        }

        Ok(self.repo.remove_member(team_id, member_id)?)
    }

    /// Renames a team. Any member may do this.
    pub fn rename_team(
        &self,
        team_id: TeamId,
        actor: MemberId,
        name: impl Into<String>,
    ) -> Result<Team, TeamServiceError> {
        let mut team = self.load_team(team_id)?;
        if !team.has_member(actor) {
            return Err(TeamServiceError::NotTeamMember(actor));
        }
        team.name = name.into().trim().to_string();
        self.repo.update_team(&team)?;
        Ok(team)
    }

    pub fn load_team(&self, team_id: TeamId) -> Result<Team, TeamServiceError> {
        self.repo
            .get_team(team_id)?
            .ok_or(TeamServiceError::TeamNotFound(team_id))
    }
}
