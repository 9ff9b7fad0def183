use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use shifty_core::schedule::range::is_active_at;
use shifty_core::{
    aggregate_day, is_active_on, project, project_month, project_week, project_year, MemberFilter,
    MonthCell, ShiftType, Task, TaskCategory, ViewMode, ViewModel,
};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Roster {
    ana: Uuid,
    ben: Uuid,
}

impl Roster {
    fn new() -> Self {
        Self {
            ana: Uuid::new_v4(),
            ben: Uuid::new_v4(),
        }
    }

    fn ids(&self) -> Vec<Uuid> {
        vec![self.ana, self.ben]
    }
}

fn june_fixture(roster: &Roster) -> Vec<Task> {
    vec![
        Task::shift(ShiftType::Day, day(2025, 6, 10), roster.ana, roster.ana).unwrap(),
        Task::new("Leave", day(2025, 6, 10), TaskCategory::Personal, roster.ben, roster.ben)
            .unwrap()
            .ending_on(day(2025, 6, 12))
            .unwrap(),
        Task::shift(ShiftType::Night, day(2025, 6, 30), roster.ben, roster.ana)
            .unwrap()
            .at(NaiveTime::from_hms_opt(22, 0, 0).unwrap()),
    ]
}

#[test]
fn single_day_task_is_active_only_on_its_date() {
    let start = day(2025, 6, 10);
    assert!(is_active_on(day(2025, 6, 10), start, None));
    assert!(!is_active_on(day(2025, 6, 9), start, None));
    assert!(!is_active_on(day(2025, 6, 11), start, None));

    // Time of day never matters.
    let late = day(2025, 6, 10).and_hms_opt(23, 59, 59).unwrap();
    let early = day(2025, 6, 10).and_hms_opt(0, 0, 0).unwrap();
    assert!(is_active_at(late, start, None));
    assert!(is_active_at(early, start, None));
}

#[test]
fn multi_day_span_is_inclusive_at_both_ends() {
    let (start, end) = (day(2025, 6, 10), day(2025, 6, 12));
    for d in 10..=12 {
        assert!(is_active_on(day(2025, 6, d), start, Some(end)), "june {d}");
    }
    assert!(!is_active_on(day(2025, 6, 9), start, Some(end)));
    assert!(!is_active_on(day(2025, 6, 13), start, Some(end)));
}

#[test]
fn june_2025_grid_has_no_blanks_and_thirty_days() {
    let roster = Roster::new();
    let tasks = june_fixture(&roster);
    let month = project_month(&tasks, day(2025, 6, 18), &roster.ids(), MemberFilter::All);

    assert_eq!((month.year, month.month), (2025, 6));
    assert_eq!(month.leading_blanks, 0);
    assert_eq!(month.days_in_month(), 30);
    assert_eq!(month.cells.len(), 30);

    let tenth = month.day(10).unwrap();
    assert_eq!(tenth.date, day(2025, 6, 10));
    assert_eq!(tenth.members[0].shift.map(|t| t.shift_type), Some(Some(ShiftType::Day)));
    assert_eq!(tenth.members[1].personal.len(), 1);
    assert!(month.day(31).is_none());
    assert!(month.day(0).is_none());
}

#[test]
fn month_grid_blanks_match_weekday_of_the_first() {
    let roster = Roster::new();
    let months = [
        day(2025, 2, 14),
        day(2024, 2, 29),
        day(2025, 3, 1),
        day(2025, 11, 30),
        day(2026, 8, 8),
    ];
    for reference in months {
        let month = project_month(&[], reference, &roster.ids(), MemberFilter::All);
        let first = reference.with_day(1).unwrap();
        assert_eq!(month.leading_blanks, first.weekday().num_days_from_sunday());

        let days = month
            .cells
            .iter()
            .filter(|cell| matches!(cell, MonthCell::Day(_)))
            .count();
        assert_eq!(month.cells.len(), month.leading_blanks as usize + days);
        assert!(month.cells[..month.leading_blanks as usize]
            .iter()
            .all(|cell| *cell == MonthCell::Blank));
    }

    // March 2025 opens on a Saturday.
    let march = project_month(&[], day(2025, 3, 20), &roster.ids(), MemberFilter::All);
    assert_eq!(march.leading_blanks, 6);
    assert_eq!(march.cells.len(), 37);
}

#[test]
fn week_runs_sunday_to_saturday_around_the_reference() {
    let roster = Roster::new();
    let tasks = june_fixture(&roster);
    let week = project_week(&tasks, day(2025, 7, 2), &roster.ids(), MemberFilter::All);

    assert_eq!(week.start, day(2025, 6, 29));
    assert_eq!(week.days.len(), 7);
    assert_eq!(week.days[0].date.weekday(), Weekday::Sun);
    assert_eq!(week.days[6].date, day(2025, 7, 5));

    let monday = &week.days[1];
    assert_eq!(monday.date, day(2025, 6, 30));
    assert_eq!(monday.members[1].member_id, roster.ben);
    assert!(monday.members[1].shift.is_some());
}

#[test]
fn year_counts_a_shared_night_shift_once() {
    let roster = Roster::new();
    let tasks = vec![
        Task::shift(ShiftType::Night, day(2025, 7, 4), roster.ana, roster.ana).unwrap(),
        Task::shift(ShiftType::Night, day(2025, 7, 4), roster.ben, roster.ana).unwrap(),
    ];
    let year = project_year(&tasks, day(2025, 7, 4), &roster.ids(), MemberFilter::All);

    assert_eq!(year.year, 2025);
    assert_eq!(year.months.len(), 12);
    let july = &year.months[6];
    assert_eq!(july.month, 7);
    assert_eq!(july.shift_days.night, 1);
    assert_eq!(july.shift_days.get(ShiftType::Night), 1);
    assert_eq!(july.shift_days.total(), 1);
    assert_eq!(july.personal_tasks, 0);
}

#[test]
fn year_counts_every_personal_task_instance() {
    let roster = Roster::new();
    let tasks = vec![
        Task::new("Gym", day(2025, 7, 4), TaskCategory::Personal, roster.ana, roster.ana).unwrap(),
        Task::new("Dentist", day(2025, 7, 4), TaskCategory::Health, roster.ben, roster.ben)
            .unwrap(),
    ];
    let year = project_year(&tasks, day(2025, 1, 1), &roster.ids(), MemberFilter::All);

    assert_eq!(year.months[6].personal_tasks, 2);
    assert_eq!(year.months[6].shift_days.total(), 0);
}

#[test]
fn year_spreads_spans_across_months_and_clips_to_the_year() {
    let roster = Roster::new();
    let tasks = vec![
        Task::shift(ShiftType::Off, day(2024, 12, 30), roster.ana, roster.ana)
            .unwrap()
            .ending_on(day(2025, 1, 2))
            .unwrap(),
        Task::new("Trip", day(2025, 3, 30), TaskCategory::Personal, roster.ben, roster.ben)
            .unwrap()
            .ending_on(day(2025, 4, 2))
            .unwrap(),
    ];
    let year = project_year(&tasks, day(2025, 6, 1), &roster.ids(), MemberFilter::All);

    assert_eq!(year.months[0].shift_days.off, 2);
    assert_eq!(year.months[2].personal_tasks, 2);
    assert_eq!(year.months[3].personal_tasks, 2);
}

#[test]
fn member_filter_narrows_every_view() {
    let roster = Roster::new();
    let tasks = june_fixture(&roster);
    let only_ben = MemberFilter::Only(roster.ben);

    let columns = aggregate_day(&tasks, day(2025, 6, 10), &roster.ids(), only_ben);
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].member_id, roster.ben);

    let year = project_year(&tasks, day(2025, 6, 10), &roster.ids(), only_ben);
    assert_eq!(year.months[5].shift_days.day, 0);
    assert_eq!(year.months[5].shift_days.night, 1);
    assert_eq!(year.months[5].personal_tasks, 3);
}

#[test]
fn tasks_of_unlisted_members_are_ignored() {
    let roster = Roster::new();
    let tasks = june_fixture(&roster);
    let only_ana = vec![roster.ana];

    let year = project_year(&tasks, day(2025, 6, 10), &only_ana, MemberFilter::All);
    assert_eq!(year.months[5].shift_days.day, 1);
    assert_eq!(year.months[5].shift_days.night, 0);
    assert_eq!(year.months[5].personal_tasks, 0);
}

#[test]
fn projection_is_repeatable_and_leaves_input_untouched() {
    let roster = Roster::new();
    let tasks = june_fixture(&roster);
    let snapshot = tasks.clone();

    for mode in [ViewMode::Week, ViewMode::Month, ViewMode::Year] {
        let first = project(&tasks, day(2025, 6, 10), mode, &roster.ids(), MemberFilter::All);
        let second = project(&tasks, day(2025, 6, 10), mode, &roster.ids(), MemberFilter::All);
        assert_eq!(first, second);
        assert_eq!(first.mode(), mode);
    }
    assert_eq!(
        aggregate_day(&tasks, day(2025, 6, 11), &roster.ids(), MemberFilter::All),
        aggregate_day(&tasks, day(2025, 6, 11), &roster.ids(), MemberFilter::All)
    );
    assert_eq!(tasks, snapshot);
}

#[test]
fn first_shift_in_input_order_wins_a_day() {
    let roster = Roster::new();
    let tasks = vec![
        Task::shift(ShiftType::Evening, day(2025, 6, 10), roster.ana, roster.ana).unwrap(),
        Task::shift(ShiftType::Day, day(2025, 6, 10), roster.ana, roster.ana).unwrap(),
    ];

    let columns = aggregate_day(&tasks, day(2025, 6, 10), &[roster.ana], MemberFilter::All);
    assert_eq!(columns[0].shift.map(|t| t.id), Some(tasks[0].id));
    assert_eq!(columns[0].shadowed_shifts, 1);

    match project(&tasks, day(2025, 6, 10), ViewMode::Year, &[roster.ana], MemberFilter::All) {
        ViewModel::Year(year) => {
            // Both slots still count toward the yearly summary.
            assert_eq!(year.months[5].shift_days.evening, 1);
            assert_eq!(year.months[5].shift_days.day, 1);
        }
        other => panic!("unexpected view: {:?}", other.mode()),
    }
}
