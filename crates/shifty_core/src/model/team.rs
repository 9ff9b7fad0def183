//! Team and member domain model.
//!
//! # Responsibility
//! - Define team membership records and their validation rules.
//!
//! # Invariants
//! - `invite_code` matches the invite code format (6-8 of `A-Z0-9`).
//! - Member ids are unique within one team; member order is join order.
//! - `color` is a hex color (`#RGB` or `#RRGGBB`).

use crate::dto::{TeamDto, TeamMemberDto};
use crate::invite::is_valid_invite_code;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("valid hex color regex")
});

pub type MemberId = Uuid;
pub type TeamId = Uuid;

/// Validation failures for team and member records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamValidationError {
    NilMemberId,
    BlankMemberName,
    InvalidColor(String),
    NilTeamId,
    BlankTeamName,
    InvalidInviteCode(String),
    DuplicateMember(MemberId),
}

impl Display for TeamValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilMemberId => write!(f, "member id must not be nil"),
            Self::BlankMemberName => write!(f, "member name must not be blank"),
            Self::InvalidColor(value) => write!(f, "invalid member color `{value}`"),
            Self::NilTeamId => write!(f, "team id must not be nil"),
            Self::BlankTeamName => write!(f, "team name must not be blank"),
            Self::InvalidInviteCode(value) => write!(f, "invalid invite code `{value}`"),
            Self::DuplicateMember(id) => write!(f, "member {id} appears twice in team"),
        }
    }
}

impl Error for TeamValidationError {}

/// One person on a team roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TeamMemberDto", into = "TeamMemberDto")]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub role: String,
    /// Hex color used as the member's visual identity.
    pub color: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl TeamMember {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        color: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, TeamValidationError> {
        let member = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role: role.into(),
            color: color.into(),
            email: email.into(),
            avatar: None,
        };
        member.validate()?;
        Ok(member)
    }

    pub fn validate(&self) -> Result<(), TeamValidationError> {
        if self.id.is_nil() {
            return Err(TeamValidationError::NilMemberId);
        }
        if self.name.trim().is_empty() {
            return Err(TeamValidationError::BlankMemberName);
        }
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(TeamValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

/// Team roster joined by invite code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TeamDto", into = "TeamDto")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub invite_code: String,
    /// Join order.
    pub members: Vec<TeamMember>,
    pub created_by: Option<MemberId>,
}

impl Team {
    pub fn member(&self, id: MemberId) -> Option<&TeamMember> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn has_member(&self, id: MemberId) -> bool {
        self.member(id).is_some()
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|member| member.id).collect()
    }

    pub fn validate(&self) -> Result<(), TeamValidationError> {
        if self.id.is_nil() {
            return Err(TeamValidationError::NilTeamId);
        }
        if self.name.trim().is_empty() {
            return Err(TeamValidationError::BlankTeamName);
        }
        if !is_valid_invite_code(&self.invite_code) {
            return Err(TeamValidationError::InvalidInviteCode(
                self.invite_code.clone(),
            ));
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            member.validate()?;
            if !seen.insert(member.id) {
                return Err(TeamValidationError::DuplicateMember(member.id));
            }
        }
        Ok(())
    }
}
