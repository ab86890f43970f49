use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::core::period::{day_window, summarize_employee, PeriodTotals, SummaryWindow};
use crate::core::DateSpan;
use crate::model::attendance::AttendanceFlag;
use crate::utils::name_cache;

#[derive(Deserialize, ToSchema)]
pub struct RecordAttendance {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "present")]
    pub flag: AttendanceFlag,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    /// `week` (trailing 7 days, default) or `month` (trailing
    /// days-in-current-month days).
    #[schema(example = "week")]
    pub window: Option<String>,
    /// Restrict the summary to a single employee.
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Reference date (YYYY-MM-DD) the window ends at; defaults to today.
    /// A malformed value is logged and ignored.
    #[schema(example = "2026-06-01")]
    pub as_of: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeSummary {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "John Doe")]
    pub name: String,
    pub totals: PeriodTotals,
}

#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    #[schema(example = "week")]
    pub window: String,
    #[schema(example = "2026-05-26", format = "date", value_type = String)]
    pub from: NaiveDate,
    #[schema(example = "2026-06-01", format = "date", value_type = String)]
    pub to: NaiveDate,
    /// Bucket totals summed over all employees in scope.
    pub totals: PeriodTotals,
    pub employees: Vec<EmployeeSummary>,
}

/// Record one attendance flag for one employee/day. Written by the
/// external capture process (System role) or HR/Admin corrections; at most
/// one row per employee per day.
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = RecordAttendance,
    responses(
        (status = 200, description = "Attendance recorded", body = Object, example = json!({
            "message": "Attendance recorded"
        })),
        (status = 400, description = "Already recorded for this day", body = Object, example = json!({
            "message": "Attendance already recorded for this day"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn record_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<RecordAttendance>,
) -> actix_web::Result<impl Responder> {
    auth.require_attendance_writer()?;

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, flag)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.date)
    .bind(payload.flag.to_string())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Attendance recorded"
        }))),

        Err(e) => {
            // Unique key on (employee_id, date)
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Attendance already recorded for this day"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id = payload.employee_id, "Attendance insert failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

async fn scope_employee_ids(
    auth: &AuthUser,
    pool: &MySqlPool,
    requested: Option<u64>,
) -> actix_web::Result<Vec<u64>> {
    if let Some(target) = requested {
        super::check_visibility(auth, pool, target).await?;
        return Ok(vec![target]);
    }

    if auth.sees_everyone() {
        let rows = sqlx::query_as::<_, (u64,)>(
            "SELECT id FROM employees WHERE status = 'active' ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list active employees");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
        return Ok(rows.into_iter().map(|(id,)| id).collect());
    }

    if auth.is_supervisor() {
        let own = auth.own_employee_id()?;
        return super::supervised_ids(pool, own).await.map_err(|e| {
            tracing::error!(error = %e, supervisor = own, "Failed to resolve supervised employees");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        });
    }

    Ok(vec![auth.own_employee_id()?])
}

/// Attendance rows for the window, keyed by (employee, day). Rows whose
/// flag does not parse are dropped with a warning so one bad row never
/// sinks the aggregation; the day then falls through the later
/// classification rules as if it had no record.
async fn load_records(
    pool: &MySqlPool,
    ids: &[u64],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<HashMap<(u64, NaiveDate), AttendanceFlag>, sqlx::Error> {
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        r#"
        SELECT employee_id, date, flag
        FROM attendance
        WHERE date BETWEEN ? AND ?
        AND employee_id IN ({})
        "#,
        placeholders
    );

    let mut query = sqlx::query_as::<_, (u64, NaiveDate, String)>(&sql)
        .bind(from)
        .bind(to);
    for id in ids {
        query = query.bind(id);
    }

    let mut records = HashMap::new();
    for (employee_id, date, flag) in query.fetch_all(pool).await? {
        match flag.parse::<AttendanceFlag>() {
            Ok(parsed) => {
                records.insert((employee_id, date), parsed);
            }
            Err(_) => {
                tracing::warn!(
                    employee_id,
                    date = %date,
                    flag = %flag,
                    "Unrecognized attendance flag, treating day as unrecorded"
                );
            }
        }
    }

    Ok(records)
}

/// Approved leave spans overlapping the window, grouped per employee.
/// Rows with a reversed date range are skipped with a warning.
async fn load_leaves(
    pool: &MySqlPool,
    ids: &[u64],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<HashMap<u64, Vec<DateSpan>>, sqlx::Error> {
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        r#"
        SELECT employee_id, start_date, end_date
        FROM leave_applications
        WHERE status = 'approved'
        AND start_date <= ?
        AND end_date >= ?
        AND employee_id IN ({})
        "#,
        placeholders
    );

    let mut query = sqlx::query_as::<_, (u64, NaiveDate, NaiveDate)>(&sql)
        .bind(to)
        .bind(from);
    for id in ids {
        query = query.bind(id);
    }

    let mut leaves: HashMap<u64, Vec<DateSpan>> = HashMap::new();
    for (employee_id, start, end) in query.fetch_all(pool).await? {
        match DateSpan::new(start, end) {
            Some(span) => leaves.entry(employee_id).or_default().push(span),
            None => {
                tracing::warn!(
                    employee_id,
                    start = %start,
                    end = %end,
                    "Reversed leave interval, skipping"
                );
            }
        }
    }

    Ok(leaves)
}

async fn load_holidays(
    pool: &MySqlPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DateSpan>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
        r#"
        SELECT start_date, end_date
        FROM holidays
        WHERE start_date <= ?
        AND end_date >= ?
        "#,
    )
    .bind(to)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(start, end)| DateSpan::new(start, end))
        .collect())
}

/// Attendance summary over a trailing window: every (employee, day) pair
/// lands in exactly one of the six buckets, except days still in the
/// future, which stay unclassified.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Bucket totals for the window", body = SummaryResponse),
        (status = 400, description = "Unknown window"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<crate::config::Config>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let window = query
        .window
        .as_deref()
        .unwrap_or("week")
        .parse::<SummaryWindow>()
        .map_err(|_| actix_web::error::ErrorBadRequest("window must be 'week' or 'month'"))?;

    let as_of = match query.as_of.as_deref() {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(error = %e, as_of = raw, "Unparsable as_of date, using today");
                chrono::Utc::now().date_naive()
            }
        },
        None => chrono::Utc::now().date_naive(),
    };

    let ids = scope_employee_ids(&auth, pool.get_ref(), query.employee_id).await?;

    let days = day_window(window, as_of);
    let from = days[0];
    let to = days[days.len() - 1];

    if ids.is_empty() {
        return Ok(HttpResponse::Ok().json(SummaryResponse {
            window: window.to_string(),
            from,
            to,
            totals: PeriodTotals::default(),
            employees: Vec::new(),
        }));
    }

    let records = load_records(pool.get_ref(), &ids, from, to)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load attendance records");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let leaves = load_leaves(pool.get_ref(), &ids, from, to).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load approved leaves");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let holidays = load_holidays(pool.get_ref(), from, to).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load holidays");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Name decoration is cosmetic; a lookup failure degrades to bare ids.
    let names = match name_cache::lookup(pool.get_ref(), &ids).await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(error = %e, "Employee name lookup failed");
            HashMap::new()
        }
    };

    let empty: Vec<DateSpan> = Vec::new();
    let mut overall = PeriodTotals::default();
    let mut employees = Vec::with_capacity(ids.len());

    for &employee_id in &ids {
        let totals = summarize_employee(
            employee_id,
            &days,
            as_of,
            config.weekly_off,
            &records,
            leaves.get(&employee_id).unwrap_or(&empty),
            &holidays,
        );
        overall += totals;
        employees.push(EmployeeSummary {
            employee_id,
            name: names
                .get(&employee_id)
                .cloned()
                .unwrap_or_else(|| employee_id.to_string()),
            totals,
        });
    }

    Ok(HttpResponse::Ok().json(SummaryResponse {
        window: window.to_string(),
        from,
        to,
        totals: overall,
        employees,
    }))
}
