//! Per-day, per-member task resolution.
//!
//! # Responsibility
//! - Split the tasks active on one day into one shift plus personal tasks for
//!   each requested member.
//!
//! # Invariants
//! - Output order follows the caller's member order; nothing is sorted.
//! - When a member has several shift tasks on one day, the first one in input
//!   order wins and the rest are counted in `shadowed_shifts`.
//! - Input tasks are only borrowed, never mutated.

use crate::model::task::Task;
use crate::model::team::MemberId;
use chrono::NaiveDate;

/// Member selection applied by the aggregator and projector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemberFilter {
    #[default]
    All,
    Only(MemberId),
}

impl MemberFilter {
    pub fn accepts(self, member_id: MemberId) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == member_id,
        }
    }
}

/// Tasks resolved for one member on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDaySchedule<'a> {
    pub member_id: MemberId,
    pub shift: Option<&'a Task>,
    /// Active tasks without a shift type, in input order.
    pub personal: Vec<&'a Task>,
    /// Shift tasks on the same day that lost to `shift`.
    pub shadowed_shifts: usize,
}

impl MemberDaySchedule<'_> {
    fn empty(member_id: MemberId) -> Self {
        Self {
            member_id,
            shift: None,
            personal: Vec::new(),
            shadowed_shifts: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shift.is_none() && self.personal.is_empty()
    }
}

/// Resolves the tasks of every accepted member that are active on `day`.
pub fn aggregate_day<'a>(
    tasks: &'a [Task],
    day: NaiveDate,
    members: &[MemberId],
    filter: MemberFilter,
) -> Vec<MemberDaySchedule<'a>> {
    let active: Vec<&Task> = tasks.iter().filter(|task| task.is_active_on(day)).collect();

    members
        .iter()
        .copied()
        .filter(|member_id| filter.accepts(*member_id))
        .map(|member_id| resolve_member(&active, member_id))
        .collect()
}

fn resolve_member<'a>(active: &[&'a Task], member_id: MemberId) -> MemberDaySchedule<'a> {
    let mut schedule = MemberDaySchedule::empty(member_id);
    for task in active.iter().copied() {
        if task.assigned_to != member_id {
            continue;
        }
        if task.is_shift() {
            if schedule.shift.is_none() {
                schedule.shift = Some(task);
            } else {
                schedule.shadowed_shifts += 1;
            }
        } else {
            schedule.personal.push(task);
        }
    }
    schedule
}
