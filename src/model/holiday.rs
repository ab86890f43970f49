use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Company-wide holiday interval, inclusive on both ends. Distinct from the
/// configured weekly-off weekday.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Holiday {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Eid")]
    pub name: String,

    #[schema(example = "2026-03-20", format = "date", value_type = String)]
    pub start_date: NaiveDate,

    #[schema(example = "2026-03-22", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}
