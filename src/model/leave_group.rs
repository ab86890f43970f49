use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Named bundle of leave policies, assignable to any number of employees.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveGroup {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Head Office Staff")]
    pub name: String,
}

/// One leave type's yearly allowance within a group.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeavePolicy {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub group_id: u64,

    #[schema(example = "annual")]
    pub leave_type: String,

    #[schema(example = 14)]
    pub allowed_days: i64,
}
