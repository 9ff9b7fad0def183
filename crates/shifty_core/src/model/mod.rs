//! Schedule domain model.
//!
//! # Responsibility
//! - Define canonical task/member/team structures used by core logic.
//! - Own construction-time validation so invalid records never reach views.
//!
//! # Invariants
//! - Every record is identified by a stable non-nil `Uuid`.
//! - A task range is inclusive and never inverted (`end_date >= date`).

pub mod task;
pub mod team;
