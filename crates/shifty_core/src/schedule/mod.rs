//! Schedule aggregation core.
//!
//! # Responsibility
//! - Decide which tasks are active on a day.
//! - Group active tasks per member and project them into calendar views.
//!
//! # Invariants
//! - Everything in this module is pure and storage-agnostic.
//! - Functions borrow the task slice and return freshly built structures.

pub mod aggregate;
pub mod projection;
pub mod range;
