use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a leave application. Only `Approved` applications ever
/// reduce a balance; `Pending` and `Rejected` are invisible to the
/// calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// One leave application as stored. `status` stays a raw string so that a
/// row with an unknown status still loads; the balance calculator simply
/// treats anything that is not `approved` as non-counting.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveApplication {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "annual")]
    pub leave_type: String,

    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,

    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,

    #[schema(example = "pending")]
    pub status: String,

    #[schema(example = "family trip", nullable = true)]
    pub reason: Option<String>,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
