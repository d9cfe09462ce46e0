//! Derived task views
//!
//! Pure computations over an in-memory task list: today's tasks, the
//! upcoming list, the Monday-to-Sunday week, completion counts and the
//! status filter. Nothing here is persisted.
//!
//! Day boundaries are calendar days in the time zone of the supplied `now`,
//! so DST days are 23 or 25 hours long. Ranges are half-open:
//! `start <= due_date < end`.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;

use super::result::{Error, Result};
use super::task::Task;

/// Maximum number of tasks in the upcoming list
pub const UPCOMING_LIMIT: usize = 5;

/// Half-open millisecond range covering one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBounds {
    pub start: i64,
    pub end: i64,
}

impl DayBounds {
    pub fn contains(&self, millis: i64) -> bool {
        self.start <= millis && millis < self.end
    }
}

/// First instant of `date` in `tz`
///
/// Where a DST jump skips local midnight, the first local time that exists
/// that day is used instead.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::default());
    let mut probe = midnight;
    // Gaps are at most a few hours; probe in 15 minute steps
    for _ in 0..16 {
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt;
        }
        probe += Duration::minutes(15);
    }
    tz.from_utc_datetime(&midnight)
}

/// Bounds of an arbitrary calendar day in `tz`
pub fn bounds_for_date<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DayBounds {
    let start = start_of_day(tz, date).timestamp_millis();
    let end = date
        .succ_opt()
        .map(|next| start_of_day(tz, next).timestamp_millis())
        .unwrap_or(i64::MAX);
    DayBounds { start, end }
}

/// Bounds of the calendar day containing `now`
pub fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> DayBounds {
    bounds_for_date(&now.timezone(), now.date_naive())
}

/// Tasks due today, in list order
pub fn today<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<Task> {
    let bounds = day_bounds(now);
    tasks
        .iter()
        .filter(|t| bounds.contains(t.due_date))
        .cloned()
        .collect()
}

/// Incomplete tasks due from tomorrow onwards, earliest first, at most five
pub fn upcoming<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<Task> {
    let tomorrow = day_bounds(now).end;
    let mut result: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.is_completed && t.due_date >= tomorrow)
        .cloned()
        .collect();
    result.sort_by_key(|t| t.due_date);
    result.truncate(UPCOMING_LIMIT);
    result
}

/// One day of the weekly schedule
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub bounds: DayBounds,
    pub tasks: Vec<Task>,
}

impl DayBucket {
    /// Short weekday label ("Mon", "Tue", ...)
    pub fn weekday_label(&self) -> String {
        self.date.format("%a").to_string()
    }
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Seven buckets from the most recent Monday through Sunday
///
/// Tasks inside a bucket are ordered by due time; tasks without a time sort
/// as "00:00". The sort is stable, so equal times keep list order.
pub fn week<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<DayBucket> {
    let tz = now.timezone();
    week_start(now.date_naive())
        .iter_days()
        .take(7)
        .map(|date| {
            let bounds = bounds_for_date(&tz, date);
            let mut day_tasks: Vec<Task> = tasks
                .iter()
                .filter(|t| bounds.contains(t.due_date))
                .cloned()
                .collect();
            day_tasks.sort_by(|a, b| a.sort_time().cmp(b.sort_time()));
            DayBucket {
                date,
                bounds,
                tasks: day_tasks,
            }
        })
        .collect()
}

/// Completion counts over a task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

pub fn counts(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|t| t.is_completed).count();
    TaskCounts {
        total: tasks.len(),
        completed,
        pending: tasks.len() - completed,
    }
}

/// Status filter for the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.is_completed,
            TaskFilter::Completed => task.is_completed,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "pending" => Ok(TaskFilter::Pending),
            "completed" | "done" => Ok(TaskFilter::Completed),
            other => Err(Error::validation(format!(
                "Unknown filter '{}'. Use all, pending or completed",
                other
            ))),
        }
    }
}

/// Tasks matching `filter`, sorted by due date
pub fn filter(tasks: &[Task], filter: TaskFilter) -> Vec<Task> {
    let mut result: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    result.sort_by_key(|t| t.due_date);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Offset, Weekday};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(10 * 3600).unwrap()
    }

    /// Wednesday 2024-05-15 13:45 at UTC+10
    fn now() -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2024, 5, 15, 13, 45, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        tz().with_ymd_and_hms(y, m, d, h, min, 0).unwrap().timestamp_millis()
    }

    fn task(id: i64, due: i64) -> Task {
        let mut t = Task::new(1, format!("Task {}", id), "Maths", due);
        t.id = id;
        t
    }

    #[test]
    fn test_day_bounds() {
        let bounds = day_bounds(&now());
        assert_eq!(bounds.start, at(2024, 5, 15, 0, 0));
        assert_eq!(bounds.end, at(2024, 5, 16, 0, 0));
        assert!(bounds.contains(bounds.start));
        assert!(!bounds.contains(bounds.end));
    }

    #[test]
    fn test_today_boundaries() {
        let bounds = day_bounds(&now());
        let tasks = vec![
            task(1, bounds.start - 1),
            task(2, bounds.start),
            task(3, bounds.end - 1),
            task(4, bounds.end),
        ];
        let ids: Vec<i64> = today(&tasks, &now()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_upcoming_excludes_completed_and_caps() {
        let tomorrow = day_bounds(&now()).end;
        let mut tasks: Vec<Task> = (0..8).map(|i| task(i, tomorrow + (8 - i) * 1000)).collect();
        tasks[7].is_completed = true;
        tasks.push(task(100, tomorrow - 1));

        let result = upcoming(&tasks, &now());
        assert_eq!(result.len(), UPCOMING_LIMIT);
        assert!(result.iter().all(|t| !t.is_completed && t.due_date >= tomorrow));
        assert!(result.windows(2).all(|w| w[0].due_date <= w[1].due_date));
        assert_eq!(result[0].id, 6);
    }

    #[test]
    fn test_week_starts_on_monday() {
        let buckets = week(&[], &now());
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());
        assert_eq!(buckets[0].date.weekday(), Weekday::Mon);
        assert_eq!(buckets[6].date.weekday(), Weekday::Sun);
        assert_eq!(buckets[0].weekday_label(), "Mon");
        assert!(buckets.windows(2).all(|w| w[0].bounds.end == w[1].bounds.start));
    }

    #[test]
    fn test_week_start_on_monday_and_sunday() {
        let monday = NaiveDate::from_ymd_opt(2024, 5, 13).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 5, 19).unwrap();
        assert_eq!(week_start(monday), monday);
        assert_eq!(week_start(sunday), monday);
    }

    #[test]
    fn test_week_buckets_sorted_by_time() {
        let mut late = task(1, at(2024, 5, 14, 9, 0));
        late.due_time = Some("18:00".into());
        let all_day = task(2, at(2024, 5, 14, 0, 0));
        let mut early = task(3, at(2024, 5, 14, 8, 0));
        early.due_time = Some("08:30".into());
        let next_week = task(4, at(2024, 5, 20, 10, 0));

        let buckets = week(&[late, all_day, early, next_week], &now());
        let tuesday: Vec<i64> = buckets[1].tasks.iter().map(|t| t.id).collect();
        assert_eq!(tuesday, vec![2, 3, 1]);
        let total: usize = buckets.iter().map(|b| b.tasks.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_counts() {
        let mut tasks = vec![task(1, 0), task(2, 0), task(3, 0)];
        tasks[1].is_completed = true;
        assert_eq!(
            counts(&tasks),
            TaskCounts {
                total: 3,
                completed: 1,
                pending: 2
            }
        );
        assert_eq!(counts(&[]), TaskCounts::default());
    }

    #[test]
    fn test_filter() {
        let mut tasks = vec![task(1, 30), task(2, 10), task(3, 20)];
        tasks[2].is_completed = true;

        let all: Vec<i64> = filter(&tasks, TaskFilter::All).iter().map(|t| t.id).collect();
        assert_eq!(all, vec![2, 3, 1]);
        let pending: Vec<i64> = filter(&tasks, TaskFilter::Pending).iter().map(|t| t.id).collect();
        assert_eq!(pending, vec![2, 1]);
        let done: Vec<i64> = filter(&tasks, TaskFilter::Completed).iter().map(|t| t.id).collect();
        assert_eq!(done, vec![3]);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("Pending".parse::<TaskFilter>().unwrap(), TaskFilter::Pending);
        assert_eq!("done".parse::<TaskFilter>().unwrap(), TaskFilter::Completed);
        assert!("later".parse::<TaskFilter>().is_err());
    }

    const HOUR_MS: i64 = 3_600_000;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_midnight_uses_first_valid_instant() {
        // Sao Paulo skipped 00:00-01:00 on 2018-11-04
        let tz = chrono_tz::America::Sao_Paulo;
        let start = start_of_day(&tz, ymd(2018, 11, 4));
        assert_eq!(
            start.naive_local(),
            ymd(2018, 11, 4).and_hms_opt(1, 0, 0).unwrap()
        );
        assert_eq!(start.offset().fix().local_minus_utc(), -2 * 3600);

        let bounds = bounds_for_date(&tz, ymd(2018, 11, 4));
        assert_eq!(bounds.end - bounds.start, 23 * HOUR_MS);
    }

    #[test]
    fn test_dst_day_lengths() {
        let tz = chrono_tz::Europe::London;

        let spring = bounds_for_date(&tz, ymd(2024, 3, 31));
        assert_eq!(spring.end - spring.start, 23 * HOUR_MS);

        let autumn = bounds_for_date(&tz, ymd(2024, 10, 27));
        assert_eq!(autumn.end - autumn.start, 25 * HOUR_MS);

        let ordinary = bounds_for_date(&tz, ymd(2024, 5, 15));
        assert_eq!(ordinary.end - ordinary.start, 24 * HOUR_MS);
    }

    #[test]
    fn test_week_buckets_contiguous_across_dst() {
        let tz = chrono_tz::Europe::London;
        for (y, m, d) in [(2024, 3, 31), (2024, 10, 27)] {
            let now = tz.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
            let buckets = week(&[], &now);

            assert_eq!(buckets.len(), 7);
            assert!(buckets.windows(2).all(|w| w[0].bounds.end == w[1].bounds.start));
            assert_eq!(buckets[6].date, ymd(y, m, d));
            assert_ne!(buckets[6].bounds.end - buckets[6].bounds.start, 24 * HOUR_MS);
        }
    }

    #[test]
    fn test_task_on_short_day_lands_in_its_bucket() {
        let tz = chrono_tz::Europe::London;
        let now = tz.with_ymd_and_hms(2024, 3, 31, 9, 0, 0).unwrap();
        let late = tz
            .with_ymd_and_hms(2024, 3, 31, 23, 30, 0)
            .unwrap()
            .timestamp_millis();

        let buckets = week(&[task(1, late)], &now);
        assert_eq!(buckets[6].tasks.len(), 1);
        assert_eq!(today(&[task(1, late)], &now).len(), 1);
    }
}
