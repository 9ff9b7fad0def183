//! Week/month/year projections of a task collection.
//!
//! # Responsibility
//! - Build render-ready calendar structures from a flat task slice.
//!
//! # Invariants
//! - Weeks start on the Sunday on or before the reference day.
//! - Month grids contain `leading_blanks + days_in_month` cells and no padding.
//! - Year counters count a shift type at most once per day, while personal
//!   tasks count once per task instance per day.
//! - Projection is pure: equal inputs always produce equal views.

use crate::model::task::{ShiftType, Task};
use crate::model::team::MemberId;
use crate::schedule::aggregate::{aggregate_day, MemberDaySchedule, MemberFilter};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

pub const DAYS_PER_WEEK: usize = 7;
pub const MONTHS_PER_YEAR: usize = 12;

/// Calendar scale requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Week,
    Month,
    Year,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// All member schedules for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn<'a> {
    pub date: NaiveDate,
    pub members: Vec<MemberDaySchedule<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView<'a> {
    /// Sunday that opens the week.
    pub start: NaiveDate,
    pub days: Vec<DayColumn<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthCell<'a> {
    /// Weekday slot before the 1st of the month.
    Blank,
    Day(DayColumn<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView<'a> {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
    /// Weekday index of the 1st (0 = Sunday).
    pub leading_blanks: u32,
    pub cells: Vec<MonthCell<'a>>,
}

impl<'a> MonthView<'a> {
    pub fn days_in_month(&self) -> usize {
        self.cells.len() - self.leading_blanks as usize
    }

    /// Looks up a populated cell by 1-based day of month.
    pub fn day(&self, day_of_month: u32) -> Option<&DayColumn<'a>> {
        let index = self.leading_blanks as usize + day_of_month.checked_sub(1)? as usize;
        match self.cells.get(index)? {
            MonthCell::Day(column) => Some(column),
            MonthCell::Blank => None,
        }
    }
}

/// Number of days in a month on which each shift type occurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftCounts {
    pub day: u32,
    pub evening: u32,
    pub night: u32,
    pub off: u32,
}

impl ShiftCounts {
    pub fn get(&self, shift: ShiftType) -> u32 {
        match shift {
            ShiftType::Day => self.day,
            ShiftType::Evening => self.evening,
            ShiftType::Night => self.night,
            ShiftType::Off => self.off,
        }
    }

    fn increment(&mut self, shift: ShiftType) {
        match shift {
            ShiftType::Day => self.day += 1,
            ShiftType::Evening => self.evening += 1,
            ShiftType::Night => self.night += 1,
            ShiftType::Off => self.off += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.day + self.evening + self.night + self.off
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSummary {
    /// 1-based month number.
    pub month: u32,
    pub shift_days: ShiftCounts,
    /// Personal task instances summed over every day of the month.
    pub personal_tasks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearView {
    pub year: i32,
    pub months: Vec<MonthSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewModel<'a> {
    Week(WeekView<'a>),
    Month(MonthView<'a>),
    Year(YearView),
}

impl ViewModel<'_> {
    pub fn mode(&self) -> ViewMode {
        match self {
            Self::Week(_) => ViewMode::Week,
            Self::Month(_) => ViewMode::Month,
            Self::Year(_) => ViewMode::Year,
        }
    }
}

/// Projects `tasks` into the view selected by `mode`.
pub fn project<'a>(
    tasks: &'a [Task],
    reference: NaiveDate,
    mode: ViewMode,
    members: &[MemberId],
    filter: MemberFilter,
) -> ViewModel<'a> {
    match mode {
        ViewMode::Week => ViewModel::Week(project_week(tasks, reference, members, filter)),
        ViewMode::Month => ViewModel::Month(project_month(tasks, reference, members, filter)),
        ViewMode::Year => ViewModel::Year(project_year(tasks, reference, members, filter)),
    }
}

/// Sunday on or before `reference`.
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    reference - Duration::days(i64::from(reference.weekday().num_days_from_sunday()))
}

/// First day of the month containing `reference`.
pub fn month_start(reference: NaiveDate) -> NaiveDate {
    reference - Duration::days(i64::from(reference.day0()))
}

/// Every day of the month containing `reference`, in order.
pub fn month_days(reference: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let month = reference.month();
    month_start(reference)
        .iter_days()
        .take_while(move |day| day.month() == month)
}

/// First day of the year containing `reference`.
pub fn year_start(reference: NaiveDate) -> NaiveDate {
    reference - Duration::days(i64::from(reference.ordinal0()))
}

/// Inclusive day range a `mode` view around `reference` covers.
pub fn view_range(reference: NaiveDate, mode: ViewMode) -> (NaiveDate, NaiveDate) {
    match mode {
        ViewMode::Week => {
            let start = week_start(reference);
            (start, start + Duration::days(DAYS_PER_WEEK as i64 - 1))
        }
        ViewMode::Month => {
            let start = month_start(reference);
            (start, month_days(reference).last().unwrap_or(start))
        }
        ViewMode::Year => {
            let start = year_start(reference);
            let year = reference.year();
            let end = start
                .iter_days()
                .take_while(|day| day.year() == year)
                .last()
                .unwrap_or(start);
            (start, end)
        }
    }
}

pub fn project_week<'a>(
    tasks: &'a [Task],
    reference: NaiveDate,
    members: &[MemberId],
    filter: MemberFilter,
) -> WeekView<'a> {
    let start = week_start(reference);
    let days = start
        .iter_days()
        .take(DAYS_PER_WEEK)
        .map(|date| DayColumn {
            date,
            members: aggregate_day(tasks, date, members, filter),
        })
        .collect();

    WeekView { start, days }
}

pub fn project_month<'a>(
    tasks: &'a [Task],
    reference: NaiveDate,
    members: &[MemberId],
    filter: MemberFilter,
) -> MonthView<'a> {
    let first = month_start(reference);
    let leading_blanks = first.weekday().num_days_from_sunday();

    let mut cells: Vec<MonthCell<'a>> = (0..leading_blanks).map(|_| MonthCell::Blank).collect();
    cells.extend(month_days(reference).map(|date| {
        MonthCell::Day(DayColumn {
            date,
            members: aggregate_day(tasks, date, members, filter),
        })
    }));

    MonthView {
        year: first.year(),
        month: first.month(),
        leading_blanks,
        cells,
    }
}

pub fn project_year(
    tasks: &[Task],
    reference: NaiveDate,
    members: &[MemberId],
    filter: MemberFilter,
) -> YearView {
    let year = reference.year();
    let (jan_first, year_end) = view_range(reference, ViewMode::Year);

    let considered: Vec<&Task> = tasks
        .iter()
        .filter(|task| {
            members.contains(&task.assigned_to)
                && filter.accepts(task.assigned_to)
                && task.overlaps(jan_first, year_end)
        })
        .collect();

    let mut months: Vec<MonthSummary> = (1..=MONTHS_PER_YEAR as u32)
        .map(|month| MonthSummary {
            month,
            shift_days: ShiftCounts::default(),
            personal_tasks: 0,
        })
        .collect();

    for day in jan_first.iter_days().take_while(|day| day.year() == year) {
        let summary = &mut months[day.month0() as usize];
        let mut shifts_today = BTreeSet::new();
        for task in considered.iter().filter(|task| task.is_active_on(day)) {
            match task.shift_type {
                Some(shift) => {
                    shifts_today.insert(shift);
                }
                None => summary.personal_tasks += 1,
            }
        }
        for shift in shifts_today {
            summary.shift_days.increment(shift);
        }
    }

    YearView { year, months }
}

#[cfg(test)]
mod tests {
    use super::{month_start, view_range, week_start, ViewMode};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_start_is_previous_or_same_sunday() {
        // 2025-06-10 is a Tuesday.
        assert_eq!(week_start(day(2025, 6, 10)), day(2025, 6, 8));
        assert_eq!(week_start(day(2025, 6, 8)), day(2025, 6, 8));
        assert_eq!(week_start(day(2025, 1, 1)), day(2024, 12, 29));
    }

    #[test]
    fn month_start_handles_last_day() {
        assert_eq!(month_start(day(2024, 2, 29)), day(2024, 2, 1));
        assert_eq!(month_start(day(2025, 12, 31)), day(2025, 12, 1));
    }

    #[test]
    fn view_range_covers_whole_period() {
        assert_eq!(
            view_range(day(2025, 6, 10), ViewMode::Week),
            (day(2025, 6, 8), day(2025, 6, 14))
        );
        assert_eq!(
            view_range(day(2024, 2, 10), ViewMode::Month),
            (day(2024, 2, 1), day(2024, 2, 29))
        );
        assert_eq!(
            view_range(day(2025, 7, 4), ViewMode::Year),
            (day(2025, 1, 1), day(2025, 12, 31))
        );
    }

    #[test]
    fn view_mode_parse_is_case_insensitive() {
        assert_eq!(ViewMode::parse(" Month "), Some(ViewMode::Month));
        assert_eq!(ViewMode::parse("decade"), None);
        assert_eq!(ViewMode::Year.as_str(), "year");
    }
}
