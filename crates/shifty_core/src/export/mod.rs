//! User-driven export formats.
//!
//! # Responsibility
//! - Serialize schedules to iCalendar for calendar apps.
//! - Write and read versioned JSON backups of one team.

pub mod backup;
pub mod ics;
