//! Weekly coverage check for (`id`, `id_2`) pairs.
//!
//! Each row describes an interval from (`startDay`, `startTime`) to
//! (`endDay`, `endTime`). Weekday names are placed in a fixed reference
//! week, Monday 2024-01-01 through Sunday 2024-01-07, so every interval
//! becomes a pair of calendar instants. An interval ending before it starts
//! wraps into the following week.
//!
//! A pair is complete when its rows together span at least 24 hours
//! (earliest start to latest end) and touch all seven weekdays.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{TransformError, TransformResult};
use crate::models::{IdLabel, Table};
use crate::transform::grouper::group_positions;

pub const ID: &str = "id";
pub const ID_2: &str = "id_2";
pub const START_DAY: &str = "startDay";
pub const START_TIME: &str = "startTime";
pub const END_DAY: &str = "endDay";
pub const END_TIME: &str = "endTime";

/// ISO year whose week 1 starts on Monday 2024-01-01.
const REFERENCE_YEAR: i32 = 2024;

/// `true` = incomplete, keyed by `id` then `id_2`.
pub type CoverageFlags = BTreeMap<IdLabel, BTreeMap<IdLabel, bool>>;

/// Thresholds a pair must reach to count as complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageRule {
    pub min_duration_secs: i64,
    pub required_weekdays: usize,
}

impl Default for CoverageRule {
    fn default() -> Self {
        Self {
            min_duration_secs: 86_400,
            required_weekdays: 7,
        }
    }
}

/// Coverage summary of one (`id`, `id_2`) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCoverage {
    pub id: IdLabel,
    pub id_2: IdLabel,
    pub first_start: NaiveDateTime,
    pub last_end: NaiveDateTime,
    pub duration_secs: i64,
    pub weekdays: usize,
    pub full_day: bool,
    pub all_weekdays: bool,
    pub incomplete: bool,
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Interval {
    /// Every weekday from the start date through the end date.
    fn weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        let last = self.end.date();
        self.start
            .date()
            .iter_days()
            .take_while(move |day| *day <= last)
            .take(7)
            .map(|day| day.weekday())
    }
}

impl CoverageRule {
    /// Per-pair coverage, ordered by (`id`, `id_2`).
    pub fn check(&self, table: &Table) -> TransformResult<Vec<GroupCoverage>> {
        table.require(&[ID, ID_2, START_DAY, START_TIME, END_DAY, END_TIME])?;

        let intervals = parse_intervals(table)?;
        let ids = table.label_column(ID)?;
        let ids_2 = table.label_column(ID_2)?;

        let groups = group_positions(ids.into_iter().zip(ids_2));

        let mut coverage = Vec::with_capacity(groups.len());
        for ((id, id_2), positions) in groups {
            let rows: Vec<&Interval> = positions.iter().map(|&p| &intervals[p]).collect();
            coverage.push(self.summarize(id, id_2, &rows));
        }

        Ok(coverage)
    }

    /// Incomplete flags keyed by `id` then `id_2`.
    pub fn flags(&self, table: &Table) -> TransformResult<CoverageFlags> {
        let mut flags = CoverageFlags::new();
        for group in self.check(table)? {
            flags
                .entry(group.id)
                .or_default()
                .insert(group.id_2, group.incomplete);
        }
        Ok(flags)
    }

    /// `rows` is never empty: every group holds at least the row that created it.
    fn summarize(&self, id: IdLabel, id_2: IdLabel, rows: &[&Interval]) -> GroupCoverage {
        let first_start = rows.iter().map(|r| r.start).fold(rows[0].start, Ord::min);
        let last_end = rows.iter().map(|r| r.end).fold(rows[0].end, Ord::max);
        let duration_secs = (last_end - first_start).num_seconds();

        let weekdays: HashSet<Weekday> = rows.iter().flat_map(|r| r.weekdays()).collect();

        let full_day = duration_secs >= self.min_duration_secs;
        let all_weekdays = weekdays.len() >= self.required_weekdays;

        GroupCoverage {
            id,
            id_2,
            first_start,
            last_end,
            duration_secs,
            weekdays: weekdays.len(),
            full_day,
            all_weekdays,
            incomplete: !(full_day && all_weekdays),
        }
    }
}

/// Incomplete flag per (`id`, `id_2`) pair with the default rule.
pub fn time_check(table: &Table) -> TransformResult<CoverageFlags> {
    CoverageRule::default().flags(table)
}

fn parse_intervals(table: &Table) -> TransformResult<Vec<Interval>> {
    let start_days = table.column(START_DAY)?;
    let start_times = table.column(START_TIME)?;
    let end_days = table.column(END_DAY)?;
    let end_times = table.column(END_TIME)?;

    let mut intervals = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let start = instant(row, (START_DAY, start_days[row]), (START_TIME, start_times[row]))?;
        let mut end = instant(row, (END_DAY, end_days[row]), (END_TIME, end_times[row]))?;
        if end < start {
            end += Duration::days(7);
        }
        intervals.push(Interval { start, end });
    }
    Ok(intervals)
}

/// Place a weekday name and time of day in the reference week.
fn instant(row: usize, day: (&str, &str), time: (&str, &str)) -> TransformResult<NaiveDateTime> {
    let (day_column, day_raw) = day;
    let (time_column, time_raw) = time;

    let weekday = day_raw
        .trim()
        .parse::<Weekday>()
        .map_err(|_| TransformError::Timestamp {
            row,
            column: day_column.to_string(),
            value: day_raw.to_string(),
            expected: "a weekday name",
        })?;

    let date = NaiveDate::from_isoywd_opt(REFERENCE_YEAR, 1, weekday).ok_or_else(|| {
        TransformError::Timestamp {
            row,
            column: day_column.to_string(),
            value: day_raw.to_string(),
            expected: "a day of the reference week",
        }
    })?;

    let time = parse_time(time_raw).ok_or_else(|| TransformError::Timestamp {
        row,
        column: time_column.to_string(),
        value: time_raw.to_string(),
        expected: "HH:MM:SS",
    })?;

    Ok(date.and_time(time))
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: [&str; 6] = ["id", "id_2", "startDay", "startTime", "endDay", "endTime"];

    fn intervals(rows: &[&[&str]]) -> Table {
        Table::from_records(&HEADERS, rows)
    }

    fn flag(flags: &CoverageFlags, id: i64, id_2: i64) -> bool {
        flags[&IdLabel::Int(id)][&IdLabel::Int(id_2)]
    }

    #[test]
    fn test_full_week_in_pieces_is_complete() {
        let table = intervals(&[
            &["1014000", "-1", "Monday", "00:00:00", "Wednesday", "12:00:00"],
            &["1014000", "-1", "Wednesday", "12:00:00", "Friday", "23:59:59"],
            &["1014000", "-1", "Saturday", "00:00:00", "Sunday", "23:59:59"],
        ]);
        let flags = time_check(&table).unwrap();
        assert!(!flag(&flags, 1014000, -1));
    }

    #[test]
    fn test_single_row_spanning_week_is_complete() {
        let table = intervals(&[&["1", "2", "Monday", "00:00:00", "Sunday", "23:59:59"]]);
        let groups = CoverageRule::default().check(&table).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].weekdays, 7);
        assert_eq!(groups[0].duration_secs, 7 * 86_400 - 1);
        assert!(!groups[0].incomplete);
    }

    #[test]
    fn test_three_weekdays_is_incomplete() {
        let table = intervals(&[
            &["1", "2", "Monday", "00:00:00", "Monday", "23:59:59"],
            &["1", "2", "Tuesday", "00:00:00", "Tuesday", "23:59:59"],
            &["1", "2", "Wednesday", "00:00:00", "Wednesday", "23:59:59"],
        ]);
        let groups = CoverageRule::default().check(&table).unwrap();

        assert!(groups[0].full_day);
        assert_eq!(groups[0].weekdays, 3);
        assert!(groups[0].incomplete);
    }

    #[test]
    fn test_one_summary_per_pair() {
        let table = intervals(&[
            &["3", "1", "Friday", "08:00", "Friday", "09:00"],
            &["1", "1", "Tuesday", "10:00", "Tuesday", "11:00"],
            &["3", "1", "Monday", "06:00", "Monday", "07:00"],
            &["1", "2", "Sunday", "00:00", "Sunday", "00:30"],
        ]);
        let groups = CoverageRule::default().check(&table).unwrap();

        let pairs: Vec<(IdLabel, IdLabel)> =
            groups.iter().map(|g| (g.id.clone(), g.id_2.clone())).collect();
        assert_eq!(
            pairs,
            vec![
                (IdLabel::Int(1), IdLabel::Int(1)),
                (IdLabel::Int(1), IdLabel::Int(2)),
                (IdLabel::Int(3), IdLabel::Int(1)),
            ]
        );

        // earliest start and latest end regardless of row order
        let last = &groups[2];
        assert_eq!(last.first_start.weekday(), Weekday::Mon);
        assert_eq!(last.last_end.weekday(), Weekday::Fri);
        assert_eq!(last.duration_secs, 4 * 86_400 + 3 * 3_600);
        assert_eq!(last.weekdays, 2);
    }

    #[test]
    fn test_weekdays_counted_per_group() {
        let table = intervals(&[
            &["1", "1", "Monday", "00:00:00", "Sunday", "23:59:59"],
            &["2", "2", "Monday", "10:00:00", "Monday", "11:00:00"],
        ]);
        let flags = time_check(&table).unwrap();

        assert!(!flag(&flags, 1, 1));
        assert!(flag(&flags, 2, 2));
    }

    #[test]
    fn test_wraparound_interval() {
        let table = intervals(&[&["5", "6", "Friday", "18:00:00", "Monday", "06:00:00"]]);
        let groups = CoverageRule::default().check(&table).unwrap();

        // Fri, Sat, Sun, Mon
        assert_eq!(groups[0].weekdays, 4);
        assert_eq!(groups[0].duration_secs, 60 * 3600);
        assert!(groups[0].incomplete);
    }

    #[test]
    fn test_two_level_ordering() {
        let table = intervals(&[
            &["2", "9", "Monday", "00:00", "Monday", "01:00"],
            &["1", "8", "Monday", "00:00", "Monday", "01:00"],
            &["1", "3", "mon", "00:00", "tue", "01:00"],
        ]);
        let flags = time_check(&table).unwrap();

        let outer: Vec<_> = flags.keys().cloned().collect();
        assert_eq!(outer, vec![IdLabel::Int(1), IdLabel::Int(2)]);
        let inner: Vec<_> = flags[&IdLabel::Int(1)].keys().cloned().collect();
        assert_eq!(inner, vec![IdLabel::Int(3), IdLabel::Int(8)]);
    }

    #[test]
    fn test_custom_rule() {
        let table = intervals(&[&["1", "1", "Monday", "00:00:00", "Tuesday", "01:00:00"]]);
        let rule = CoverageRule {
            min_duration_secs: 3600,
            required_weekdays: 2,
        };
        assert!(!rule.flags(&table).unwrap()[&IdLabel::Int(1)][&IdLabel::Int(1)]);
    }

    #[test]
    fn test_bad_weekday() {
        let table = intervals(&[&["1", "1", "Moonday", "00:00:00", "Sunday", "23:59:59"]]);
        let err = time_check(&table).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Timestamp { row: 0, ref column, .. } if column == "startDay"
        ));
    }

    #[test]
    fn test_bad_time() {
        let table = intervals(&[&["1", "1", "Monday", "00:00:00", "Sunday", "25:61:00"]]);
        let err = time_check(&table).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Timestamp { ref column, .. } if column == "endTime"
        ));
    }

    #[test]
    fn test_missing_column() {
        let table = Table::from_records(&["id", "id_2"], &[&["1", "2"]]);
        assert!(matches!(time_check(&table), Err(TransformError::MissingColumn(_))));
    }
}
