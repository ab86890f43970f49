//! Attendance period aggregator.
//!
//! Classifies every (employee, day) pair of a trailing window into exactly
//! one of six buckets and sums them. Classification is per-day, so the
//! totals are independent of iteration order.

use std::collections::HashMap;
use std::ops::AddAssign;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::DateSpan;
use crate::model::attendance::AttendanceFlag;

/// Trailing reporting window ending at the as-of day, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SummaryWindow {
    /// Trailing 7 days.
    Week,
    /// Trailing days-in-current-month days.
    Month,
}

impl SummaryWindow {
    pub fn day_count(self, as_of: NaiveDate) -> i64 {
        match self {
            SummaryWindow::Week => 7,
            SummaryWindow::Month => days_in_month(as_of),
        }
    }
}

fn days_in_month(as_of: NaiveDate) -> i64 {
    let first = NaiveDate::from_ymd_opt(as_of.year(), as_of.month(), 1)
        .expect("first of month exists");
    let next = if as_of.month() == 12 {
        NaiveDate::from_ymd_opt(as_of.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(as_of.year(), as_of.month() + 1, 1)
    }
    .expect("first of next month exists");
    next.signed_duration_since(first).num_days()
}

/// The day sequence `[as_of - (n-1) .. as_of]`, oldest first.
pub fn day_window(window: SummaryWindow, as_of: NaiveDate) -> Vec<NaiveDate> {
    let n = window.day_count(as_of);
    (0..n)
        .map(|offset| as_of - Duration::days(n - 1 - offset))
        .collect()
}

/// Six bucket counters, additive across employees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PeriodTotals {
    pub present: u32,
    pub delay: u32,
    pub weekend: u32,
    pub holiday: u32,
    pub leave: u32,
    pub absent: u32,
}

impl PeriodTotals {
    pub fn bump(&mut self, bucket: AttendanceFlag) {
        match bucket {
            AttendanceFlag::Present => self.present += 1,
            AttendanceFlag::Delay => self.delay += 1,
            AttendanceFlag::Weekend => self.weekend += 1,
            AttendanceFlag::Holiday => self.holiday += 1,
            AttendanceFlag::Leave => self.leave += 1,
            AttendanceFlag::Absent => self.absent += 1,
        }
    }

    pub fn classified(&self) -> u32 {
        self.present + self.delay + self.weekend + self.holiday + self.leave + self.absent
    }
}

impl AddAssign for PeriodTotals {
    fn add_assign(&mut self, other: PeriodTotals) {
        self.present += other.present;
        self.delay += other.delay;
        self.weekend += other.weekend;
        self.holiday += other.holiday;
        self.leave += other.leave;
        self.absent += other.absent;
    }
}

/// Resolves one (employee, day) to at most one bucket, first match wins:
///
/// 1. a recorded attendance flag for the day,
/// 2. an approved leave interval containing the day,
/// 3. a company holiday interval containing the day,
/// 4. the configured weekly-off weekday,
/// 5. Absent for past days; future days stay unclassified.
///
/// A record whose flag did not parse must be passed as `recorded = None`:
/// unrecognized flags fall through to the later rules exactly as if the
/// row did not exist. That is a policy choice, not leniency for bad data.
pub fn classify_day(
    day: NaiveDate,
    as_of: NaiveDate,
    recorded: Option<AttendanceFlag>,
    on_leave: bool,
    on_holiday: bool,
    weekly_off: Weekday,
) -> Option<AttendanceFlag> {
    if let Some(flag) = recorded {
        return Some(flag);
    }
    if on_leave {
        return Some(AttendanceFlag::Leave);
    }
    if on_holiday {
        return Some(AttendanceFlag::Holiday);
    }
    if day.weekday() == weekly_off {
        return Some(AttendanceFlag::Weekend);
    }
    if day > as_of {
        None
    } else {
        Some(AttendanceFlag::Absent)
    }
}

/// Bucket totals for one employee over `days`.
///
/// `records` is keyed by `(employee_id, day)` and holds only flags that
/// parsed; `leaves` are the employee's approved leave intervals and
/// `holidays` the company-wide ones.
pub fn summarize_employee(
    employee_id: u64,
    days: &[NaiveDate],
    as_of: NaiveDate,
    weekly_off: Weekday,
    records: &HashMap<(u64, NaiveDate), AttendanceFlag>,
    leaves: &[DateSpan],
    holidays: &[DateSpan],
) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    for &day in days {
        let recorded = records.get(&(employee_id, day)).copied();
        let on_leave = leaves.iter().any(|span| span.contains(day));
        let on_holiday = holidays.iter().any(|span| span.contains(day));
        if let Some(bucket) = classify_day(day, as_of, recorded, on_leave, on_holiday, weekly_off) {
            totals.bump(bucket);
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn span(start: NaiveDate, end: NaiveDate) -> DateSpan {
        DateSpan::new(start, end).unwrap()
    }

    #[test]
    fn week_window_is_trailing_seven_days() {
        let days = day_window(SummaryWindow::Week, d(2024, 3, 10));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], d(2024, 3, 4));
        assert_eq!(days[6], d(2024, 3, 10));
    }

    #[test]
    fn month_window_uses_days_in_current_month() {
        // February 2024 is a leap month.
        let days = day_window(SummaryWindow::Month, d(2024, 2, 10));
        assert_eq!(days.len(), 29);
        assert_eq!(days[28], d(2024, 2, 10));

        let days = day_window(SummaryWindow::Month, d(2024, 4, 10));
        assert_eq!(days.len(), 30);
    }

    #[test]
    fn empty_inputs_yield_only_calendar_buckets() {
        // 2024-03-04 is a Monday; window Mon..Sun contains one Sunday.
        let as_of = d(2024, 3, 10);
        let days = day_window(SummaryWindow::Week, as_of);
        let totals = summarize_employee(
            1,
            &days,
            as_of,
            Weekday::Sun,
            &HashMap::new(),
            &[],
            &[],
        );
        assert_eq!(totals.weekend, 1);
        assert_eq!(totals.holiday, 0);
        assert_eq!(totals.leave, 0);
        assert_eq!(totals.present, 0);
        assert_eq!(totals.absent, 6);
    }

    #[test]
    fn recorded_flag_wins_over_leave_and_holiday() {
        let day = d(2024, 3, 5);
        let bucket = classify_day(
            day,
            d(2024, 3, 10),
            Some(AttendanceFlag::Delay),
            true,
            true,
            Weekday::Sun,
        );
        assert_eq!(bucket, Some(AttendanceFlag::Delay));
    }

    #[test]
    fn leave_wins_over_holiday_and_weekend() {
        // 2024-03-10 is a Sunday.
        let day = d(2024, 3, 10);
        let bucket = classify_day(day, d(2024, 3, 10), None, true, true, Weekday::Sun);
        assert_eq!(bucket, Some(AttendanceFlag::Leave));
    }

    #[test]
    fn holiday_wins_over_weekend() {
        let day = d(2024, 3, 10); // Sunday
        let bucket = classify_day(day, d(2024, 3, 10), None, false, true, Weekday::Sun);
        assert_eq!(bucket, Some(AttendanceFlag::Holiday));
    }

    #[test]
    fn future_days_stay_unclassified() {
        let bucket = classify_day(d(2024, 3, 11), d(2024, 3, 10), None, false, false, Weekday::Sun);
        assert_eq!(bucket, None);
    }

    #[test]
    fn future_weekly_off_still_counts_as_weekend() {
        // Weekly-off is terminal before the future check.
        let day = d(2024, 3, 17); // Sunday, after as_of
        let bucket = classify_day(day, d(2024, 3, 10), None, false, false, Weekday::Sun);
        assert_eq!(bucket, Some(AttendanceFlag::Weekend));
    }

    #[test]
    fn unrecognized_record_falls_through_to_leave() {
        // The loader maps an unknown flag to `recorded = None`; with an
        // approved leave the day lands in Leave, as if the row never existed.
        let day = d(2024, 3, 5);
        let bucket = classify_day(day, d(2024, 3, 10), None, true, false, Weekday::Sun);
        assert_eq!(bucket, Some(AttendanceFlag::Leave));
    }

    #[test]
    fn every_day_is_classified_once_or_future() {
        // Mid-window as_of: trailing week ends Wednesday, no future days;
        // shift as_of back so the invariant covers the future branch too.
        let as_of = d(2024, 3, 6);
        let days: Vec<NaiveDate> = (0..7).map(|i| d(2024, 3, 4) + Duration::days(i)).collect();

        let mut records = HashMap::new();
        records.insert((1, d(2024, 3, 4)), AttendanceFlag::Present);

        let leaves = vec![span(d(2024, 3, 5), d(2024, 3, 5))];
        let holidays = vec![span(d(2024, 3, 6), d(2024, 3, 6))];

        let totals = summarize_employee(1, &days, as_of, Weekday::Sun, &records, &leaves, &holidays);
        // Unclassified days are exactly the future ones that hit no earlier
        // rule: Mar 7-9. Mar 10 is future too but weekly-off is terminal.
        let unclassified = days.len() as u32 - totals.classified();
        assert_eq!(unclassified, 3);
        assert_eq!(totals.present, 1);
        assert_eq!(totals.leave, 1);
        assert_eq!(totals.holiday, 1);
        assert_eq!(totals.weekend, 1);
    }

    #[test]
    fn totals_add_across_employees() {
        let mut overall = PeriodTotals::default();
        let a = PeriodTotals { present: 2, absent: 1, ..Default::default() };
        let b = PeriodTotals { present: 1, leave: 3, ..Default::default() };
        overall += a;
        overall += b;
        assert_eq!(overall.present, 3);
        assert_eq!(overall.absent, 1);
        assert_eq!(overall.leave, 3);
        assert_eq!(overall.classified(), 7);
    }
}
