use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Daily classification of one employee. The same six values are used both
/// for raw recorded flags and for the buckets the period aggregator emits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceFlag {
    Present,
    Delay,
    Leave,
    Holiday,
    Weekend,
    Absent,
}

/// Raw attendance row, at most one per employee per day (unique key on
/// `(employee_id, date)`). The flag stays a string on the way out of the
/// database; rows with a flag we do not recognize are skipped with a
/// warning instead of failing the whole aggregation.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[schema(example = "present")]
    pub flag: String,
}
