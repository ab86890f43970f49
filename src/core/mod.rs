pub mod balance;
pub mod period;

use chrono::NaiveDate;

/// Inclusive calendar-date interval. Construction rejects reversed spans so
/// downstream interval math never sees `end < start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if end < start {
            None
        } else {
            Some(Self { start, end })
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Inclusive day count of the intersection with `other`; 0 when the
    /// spans do not intersect.
    pub fn overlap_days(&self, other: &DateSpan) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if end < start {
            0
        } else {
            end.signed_duration_since(start).num_days() + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn reversed_span_is_rejected() {
        assert!(DateSpan::new(d(2024, 3, 5), d(2024, 3, 1)).is_none());
        assert!(DateSpan::new(d(2024, 3, 5), d(2024, 3, 5)).is_some());
    }

    #[test]
    fn overlap_is_inclusive_on_both_ends() {
        let a = DateSpan::new(d(2024, 3, 1), d(2024, 3, 5)).unwrap();
        let b = DateSpan::new(d(2024, 3, 5), d(2024, 3, 10)).unwrap();
        assert_eq!(a.overlap_days(&b), 1);
        assert_eq!(b.overlap_days(&a), 1);
    }

    #[test]
    fn disjoint_spans_overlap_zero() {
        let a = DateSpan::new(d(2024, 3, 1), d(2024, 3, 5)).unwrap();
        let b = DateSpan::new(d(2024, 3, 6), d(2024, 3, 10)).unwrap();
        assert_eq!(a.overlap_days(&b), 0);
    }

    #[test]
    fn single_day_span_contains_only_itself() {
        let a = DateSpan::new(d(2024, 3, 5), d(2024, 3, 5)).unwrap();
        assert!(a.contains(d(2024, 3, 5)));
        assert!(!a.contains(d(2024, 3, 4)));
        assert!(!a.contains(d(2024, 3, 6)));
    }
}
