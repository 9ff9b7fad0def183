//! iCalendar (RFC 5545) export of task records.
//!
//! # Invariants
//! - Untimed tasks become all-day events with an exclusive `DTEND`
//!   (last day + 1).
//! - Timed tasks use floating local times; the same time of day applies to
//!   the first and last day.
//! - The calendar carries exactly one `PRODID`.
//! - Each category is its own `CATEGORIES` line, so values are never comma-escaped.

use crate::model::task::Task;
use crate::model::team::TeamMember;
use chrono::Duration;
use icalendar::{
    Calendar, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike, Property,
};

const PRODID: &str = "-//Shifty//Schedule//EN";

/// Exports `tasks` as one calendar, naming assignees found in `members`.
pub fn export_ics(tasks: &[Task], members: &[TeamMember], calendar_name: &str) -> String {
    let mut calendar = Calendar::empty();
    calendar
        .append_property(Property::new("VERSION", "2.0"))
        .append_property(Property::new("PRODID", PRODID))
        .append_property(Property::new("CALSCALE", "GREGORIAN"));
    calendar.name(calendar_name);

    for task in tasks {
        let assignee = members.iter().find(|member| member.id == task.assigned_to);
        calendar.push(task_to_event(task, assignee));
    }

    calendar.done().to_string()
}

fn task_to_event(task: &Task, assignee: Option<&TeamMember>) -> Event {
    let mut event = Event::new();
    event.uid(&task.id.to_string());

    let summary = match assignee {
        Some(member) => format!("{} ({})", task.title, member.name),
        None => task.title.clone(),
    };
    event.summary(&summary);

    match task.time {
        Some(time) => {
            event.starts(DatePerhapsTime::DateTime(CalendarDateTime::Floating(
                task.date.and_time(time),
            )));
            if let Some(end_date) = task.end_date {
                event.ends(DatePerhapsTime::DateTime(CalendarDateTime::Floating(
                    end_date.and_time(time),
                )));
            }
        }
        None => {
            event.starts(DatePerhapsTime::Date(task.date));
            event.ends(DatePerhapsTime::Date(task.last_day() + Duration::days(1)));
        }
    }

    event.add_multi_property("CATEGORIES", task.category.as_str());
    if let Some(shift) = task.shift_type {
        event.add_multi_property("CATEGORIES", shift.as_str());
    }

    event.done()
}

#[cfg(test)]
mod tests {
    use super::export_ics;
    use crate::model::task::{ShiftType, Task, TaskCategory};
    use crate::model::team::TeamMember;
    use chrono::{NaiveDate, NaiveTime};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn all_day_span_uses_exclusive_end() {
        let ana = TeamMember::new("Ana", "RN", "#ff0000", "ana@example.com").unwrap();
        let leave = Task::new(
            "Annual leave",
            day(2025, 6, 10),
            TaskCategory::Personal,
            ana.id,
            ana.id,
        )
        .unwrap()
        .ending_on(day(2025, 6, 12))
        .unwrap();

        let ics = export_ics(&[leave.clone()], &[ana], "Ward 7");
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains(&leave.id.to_string()));
        assert!(ics.contains("SUMMARY:Annual leave (Ana)"));
        assert!(ics.contains("20250610"));
        assert!(ics.contains("20250613"));
    }

    #[test]
    fn timed_shift_has_time_component() {
        let ana = TeamMember::new("Ana", "RN", "#ff0000", "ana@example.com").unwrap();
        let shift = Task::shift(ShiftType::Night, day(2025, 7, 4), ana.id, ana.id)
            .unwrap()
            .at(NaiveTime::from_hms_opt(22, 0, 0).unwrap());

        let ics = export_ics(&[shift], &[], "Ward 7");
        assert!(ics.contains("20250704T220000"));
        assert!(ics.contains("SUMMARY:Night shift"));
        assert!(!ics.contains("(Ana)"));
    }

    fn lines_starting<'a>(ics: &'a str, prefix: &str) -> Vec<&'a str> {
        ics.lines().filter(|line| line.starts_with(prefix)).collect()
    }

    #[test]
    fn calendar_header_and_categories_are_well_formed() {
        let ana = TeamMember::new("Ana", "RN", "#ff0000", "ana@example.com").unwrap();
        let day_shift = Task::shift(ShiftType::Day, day(2025, 7, 4), ana.id, ana.id).unwrap();
        let night_shift = Task::shift(ShiftType::Night, day(2025, 7, 5), ana.id, ana.id).unwrap();

        let ics = export_ics(&[day_shift, night_shift], &[ana], "Ward 7");
        let starting = |prefix: &str| lines_starting(&ics, prefix);

        assert_eq!(starting("PRODID"), ["PRODID:-//Shifty//Schedule//EN"]);
        assert_eq!(starting("VERSION").len(), 1);
        assert_eq!(
            starting("CATEGORIES"),
            [
                "CATEGORIES:work",
                "CATEGORIES:day",
                "CATEGORIES:work",
                "CATEGORIES:night"
            ]
        );
        assert!(!ics.contains("\\,"));
    }
}
