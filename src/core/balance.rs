//! Leave-balance calculator.
//!
//! Pure function of the employee's policy set, their full application list
//! and an as-of date. No database access happens here; callers hand in a
//! snapshot and re-invoke whenever that snapshot changes.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use super::DateSpan;
use crate::model::leave::{LeaveApplication, LeaveStatus};
use crate::model::leave_group::LeavePolicy;

/// Per-policy usage within one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PolicyBalance {
    #[schema(example = "annual")]
    pub leave_type: String,
    #[schema(example = 14)]
    pub allowed: i64,
    #[schema(example = 5)]
    pub used: i64,
    #[schema(example = 9)]
    pub remaining: i64,
}

/// Inclusive `[Jan 1, Dec 31]` window of `as_of`'s year.
pub fn year_window(as_of: NaiveDate) -> DateSpan {
    let year = as_of.year();
    DateSpan {
        start: NaiveDate::from_ymd_opt(year, 1, 1).expect("Jan 1 exists"),
        end: NaiveDate::from_ymd_opt(year, 12, 31).expect("Dec 31 exists"),
    }
}

fn is_approved(application: &LeaveApplication) -> bool {
    matches!(
        application.status.parse::<LeaveStatus>(),
        Ok(LeaveStatus::Approved)
    )
}

/// Days of `application` that fall inside `window`. An application whose
/// stored range is reversed contributes nothing rather than failing the
/// whole computation.
fn in_window_days(application: &LeaveApplication, window: &DateSpan) -> i64 {
    DateSpan::new(application.start_date, application.end_date)
        .map(|span| span.overlap_days(window))
        .unwrap_or(0)
}

/// One `PolicyBalance` per policy, in policy order.
///
/// Only approved applications of the matching type count, clipped to the
/// current calendar year. Overlapping approved applications of the same
/// type are summed independently; days covered twice are charged twice.
/// `remaining` is floored at zero.
pub fn leave_balances(
    policies: &[LeavePolicy],
    applications: &[LeaveApplication],
    as_of: NaiveDate,
) -> Vec<PolicyBalance> {
    let window = year_window(as_of);

    policies
        .iter()
        .map(|policy| {
            let used: i64 = applications
                .iter()
                .filter(|app| is_approved(app) && app.leave_type == policy.leave_type)
                .map(|app| in_window_days(app, &window))
                .sum();

            PolicyBalance {
                leave_type: policy.leave_type.clone(),
                allowed: policy.allowed_days,
                used,
                remaining: (policy.allowed_days - used).max(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn policy(leave_type: &str, allowed_days: i64) -> LeavePolicy {
        LeavePolicy {
            id: 1,
            group_id: 1,
            leave_type: leave_type.into(),
            allowed_days,
        }
    }

    fn app(leave_type: &str, status: &str, start: NaiveDate, end: NaiveDate) -> LeaveApplication {
        LeaveApplication {
            id: 1,
            employee_id: 1000,
            leave_type: leave_type.into(),
            start_date: start,
            end_date: end,
            status: status.into(),
            reason: None,
            created_at: None,
        }
    }

    #[test]
    fn approved_in_year_usage_is_charged() {
        let balances = leave_balances(
            &[policy("annual", 14)],
            &[app("annual", "approved", d(2024, 3, 1), d(2024, 3, 5))],
            d(2024, 6, 1),
        );
        assert_eq!(
            balances,
            vec![PolicyBalance {
                leave_type: "annual".into(),
                allowed: 14,
                used: 5,
                remaining: 9,
            }]
        );
    }

    #[test]
    fn overlapping_applications_are_charged_independently() {
        let balances = leave_balances(
            &[policy("annual", 14)],
            &[
                app("annual", "approved", d(2024, 3, 1), d(2024, 3, 5)),
                app("annual", "approved", d(2024, 3, 4), d(2024, 3, 10)),
            ],
            d(2024, 6, 1),
        );
        assert_eq!(balances[0].used, 12);
        assert_eq!(balances[0].remaining, 2);
    }

    #[test]
    fn pending_and_rejected_never_count() {
        let balances = leave_balances(
            &[policy("annual", 14)],
            &[
                app("annual", "pending", d(2024, 3, 1), d(2024, 3, 5)),
                app("annual", "rejected", d(2024, 4, 1), d(2024, 4, 5)),
            ],
            d(2024, 6, 1),
        );
        assert_eq!(balances[0].used, 0);
        assert_eq!(balances[0].remaining, 14);
    }

    #[test]
    fn application_outside_year_contributes_nothing() {
        let balances = leave_balances(
            &[policy("annual", 14)],
            &[app("annual", "approved", d(2023, 3, 1), d(2023, 3, 5))],
            d(2024, 6, 1),
        );
        assert_eq!(balances[0].used, 0);
    }

    #[test]
    fn year_boundary_application_charges_only_in_year_days() {
        // Dec 28 (prev year) .. Jan 3 (this year) => Jan 1-3 inclusive.
        let balances = leave_balances(
            &[policy("annual", 14)],
            &[app("annual", "approved", d(2023, 12, 28), d(2024, 1, 3))],
            d(2024, 6, 1),
        );
        assert_eq!(balances[0].used, 3);
    }

    #[test]
    fn remaining_is_floored_at_zero() {
        let balances = leave_balances(
            &[policy("sick", 3)],
            &[app("sick", "approved", d(2024, 2, 1), d(2024, 2, 10))],
            d(2024, 6, 1),
        );
        assert_eq!(balances[0].used, 10);
        assert_eq!(balances[0].remaining, 0);
    }

    #[test]
    fn other_leave_types_are_not_charged() {
        let balances = leave_balances(
            &[policy("annual", 14), policy("sick", 7)],
            &[app("sick", "approved", d(2024, 2, 1), d(2024, 2, 2))],
            d(2024, 6, 1),
        );
        assert_eq!(balances[0].used, 0);
        assert_eq!(balances[1].used, 2);
    }

    #[test]
    fn unknown_status_is_treated_as_non_counting() {
        let balances = leave_balances(
            &[policy("annual", 14)],
            &[app("annual", "cancelled?", d(2024, 3, 1), d(2024, 3, 5))],
            d(2024, 6, 1),
        );
        assert_eq!(balances[0].used, 0);
    }

    #[test]
    fn no_policies_means_no_balances() {
        let balances = leave_balances(
            &[],
            &[app("annual", "approved", d(2024, 3, 1), d(2024, 3, 5))],
            d(2024, 6, 1),
        );
        assert!(balances.is_empty());
    }

    #[test]
    fn reversed_application_range_contributes_nothing() {
        let balances = leave_balances(
            &[policy("annual", 14)],
            &[app("annual", "approved", d(2024, 3, 5), d(2024, 3, 1))],
            d(2024, 6, 1),
        );
        assert_eq!(balances[0].used, 0);
    }
}
