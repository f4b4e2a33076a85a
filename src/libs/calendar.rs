//! Week-based calendar of due tasks.
//!
//! Weeks start on Monday. The by-date query returns one entry per day of the
//! requested range plus the tasks that were due before it; the overdue part
//! is only shown for the week containing today.

use super::task::{Task, TasksByDate};
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

pub const OVERDUE_TITLE: &str = "Overdue Tasks";
pub const THIS_WEEK_TITLE: &str = "This week";

/// Inclusive `[monday, sunday]` range containing `date`.
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWeek {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_current: bool,
}

impl CalendarWeek {
    pub fn containing(date: NaiveDate, today: NaiveDate) -> Self {
        let (start, end) = week_range(date);
        Self {
            start,
            end,
            is_current: start <= today && today <= end,
        }
    }

    /// The week `offset` weeks away from the one containing `today`.
    pub fn relative(today: NaiveDate, offset: i64) -> Self {
        Self::containing(today + Duration::weeks(offset), today)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..7).map(move |offset| start + Duration::days(offset))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    Overdue,
    Day(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub kind: BucketKind,
    pub tasks: Vec<Task>,
}

/// Day buckets in date order, preceded by the overdue bucket when it was
/// requested and has anything in it.
pub fn buckets(response: TasksByDate, include_overdue: bool) -> Vec<Bucket> {
    let mut days = response.by_dates;
    days.sort_by_key(|day| day.date);

    let mut result = Vec::with_capacity(days.len() + 1);
    if include_overdue && !response.overdue.is_empty() {
        result.push(Bucket {
            kind: BucketKind::Overdue,
            tasks: response.overdue,
        });
    }
    result.extend(days.into_iter().map(|day| Bucket {
        kind: BucketKind::Day(day.date),
        tasks: day.tasks,
    }));
    result
}

fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Short human label for a due date relative to `today`.
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_string();
    }
    if date == today + Duration::days(1) {
        return "Tomorrow".to_string();
    }
    if CalendarWeek::containing(today, today).contains(date) {
        return weekday_name(date);
    }
    if date.year() == today.year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

fn padded_date(date: NaiveDate, today: NaiveDate) -> String {
    if date.year() == today.year() {
        date.format("%b %d").to_string()
    } else {
        date.format("%b %d, %Y").to_string()
    }
}

pub fn bucket_title(bucket: &Bucket, today: NaiveDate) -> String {
    match bucket.kind {
        BucketKind::Overdue => OVERDUE_TITLE.to_string(),
        BucketKind::Day(date) => {
            let day = if date == today {
                "Today".to_string()
            } else if date == today + Duration::days(1) {
                "Tomorrow".to_string()
            } else {
                weekday_name(date)
            };
            format!("{}  ·  {}", padded_date(date, today), day)
        }
    }
}

pub fn week_title(week: &CalendarWeek, today: NaiveDate) -> String {
    if week.is_current {
        return THIS_WEEK_TITLE.to_string();
    }
    if week.start.year() == today.year() && week.end.year() == today.year() {
        format!("{} — {}", week.start.format("%b %d"), week.end.format("%b %d"))
    } else {
        format!("{} — {}", week.start.format("%b %d, %Y"), week.end.format("%b %d, %Y"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DueUrgency {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    Later,
}

pub fn due_urgency(date: NaiveDate, today: NaiveDate) -> DueUrgency {
    if date < today {
        DueUrgency::Overdue
    } else if date == today {
        DueUrgency::Today
    } else if date == today + Duration::days(1) {
        DueUrgency::Tomorrow
    } else if CalendarWeek::containing(today, today).contains(date) {
        DueUrgency::ThisWeek
    } else {
        DueUrgency::Later
    }
}

impl fmt::Display for DueUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self {
            Self::Overdue => "!",
            Self::Today | Self::Tomorrow => "*",
            Self::ThisWeek | Self::Later => "",
        };
        f.write_str(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::DateTasks;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(title: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            section_id: Uuid::nil(),
            title: title.to_string(),
            description: None,
            content: None,
            is_completed: false,
            is_archived: false,
            added_at: "2025-01-01T00:00:00".to_string(),
            due_to: None,
            recurrence: None,
            attachments: vec![],
        }
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-01-15 is a Wednesday
        assert_eq!(week_range(date(2025, 1, 15)), (date(2025, 1, 13), date(2025, 1, 19)));
        assert_eq!(week_range(date(2025, 1, 13)), (date(2025, 1, 13), date(2025, 1, 19)));
        assert_eq!(week_range(date(2025, 1, 19)), (date(2025, 1, 13), date(2025, 1, 19)));
    }

    #[test]
    fn only_the_week_of_today_is_current() {
        let today = date(2025, 1, 15);
        assert!(CalendarWeek::containing(date(2025, 1, 19), today).is_current);
        assert!(!CalendarWeek::relative(today, 1).is_current);
        assert_eq!(CalendarWeek::relative(today, -1).start, date(2025, 1, 6));
        assert_eq!(CalendarWeek::relative(today, 0).days().count(), 7);
    }

    #[test]
    fn labels_relative_to_today() {
        let today = date(2025, 1, 15);
        assert_eq!(date_label(today, today), "Today");
        assert_eq!(date_label(date(2025, 1, 16), today), "Tomorrow");
        assert_eq!(date_label(date(2025, 1, 18), today), "Saturday");
        assert_eq!(date_label(date(2025, 1, 13), today), "Monday");
        assert_eq!(date_label(date(2025, 2, 1), today), "Feb 1");
        assert_eq!(date_label(date(2024, 12, 25), today), "Dec 25, 2024");
    }

    #[test]
    fn overdue_bucket_comes_first_only_when_requested_and_non_empty() {
        let response = TasksByDate {
            by_dates: vec![
                DateTasks {
                    date: date(2025, 1, 14),
                    tasks: vec![task("b")],
                },
                DateTasks {
                    date: date(2025, 1, 13),
                    tasks: vec![task("a")],
                },
            ],
            overdue: vec![task("late")],
        };

        let with = buckets(response.clone(), true);
        let kinds: Vec<BucketKind> = with.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BucketKind::Overdue, BucketKind::Day(date(2025, 1, 13)), BucketKind::Day(date(2025, 1, 14))]
        );

        let without = buckets(response.clone(), false);
        assert_eq!(without.len(), 2);

        let empty_overdue = TasksByDate {
            overdue: vec![],
            ..response
        };
        assert_eq!(buckets(empty_overdue, true)[0].kind, BucketKind::Day(date(2025, 1, 13)));
    }

    #[test]
    fn bucket_and_week_titles() {
        let today = date(2025, 1, 15);
        let bucket = |kind| Bucket { kind, tasks: vec![] };
        assert_eq!(bucket_title(&bucket(BucketKind::Overdue), today), "Overdue Tasks");
        assert_eq!(bucket_title(&bucket(BucketKind::Day(today)), today), "Jan 15  ·  Today");
        assert_eq!(bucket_title(&bucket(BucketKind::Day(date(2025, 1, 16))), today), "Jan 16  ·  Tomorrow");
        assert_eq!(bucket_title(&bucket(BucketKind::Day(date(2025, 1, 20))), today), "Jan 20  ·  Monday");
        assert_eq!(
            bucket_title(&bucket(BucketKind::Day(date(2024, 12, 30))), today),
            "Dec 30, 2024  ·  Monday"
        );

        assert_eq!(week_title(&CalendarWeek::relative(today, 0), today), "This week");
        assert_eq!(week_title(&CalendarWeek::relative(today, 1), today), "Jan 20 — Jan 26");
        assert_eq!(
            week_title(&CalendarWeek::relative(today, -2), today),
            "Dec 30, 2024 — Jan 05, 2025"
        );
    }

    #[test]
    fn urgency_grades() {
        let today = date(2025, 1, 15);
        assert_eq!(due_urgency(date(2025, 1, 14), today), DueUrgency::Overdue);
        assert_eq!(due_urgency(today, today), DueUrgency::Today);
        assert_eq!(due_urgency(date(2025, 1, 16), today), DueUrgency::Tomorrow);
        assert_eq!(due_urgency(date(2025, 1, 19), today), DueUrgency::ThisWeek);
        assert_eq!(due_urgency(date(2025, 1, 20), today), DueUrgency::Later);
    }
}
