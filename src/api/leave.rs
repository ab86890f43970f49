use actix_web::{web, HttpResponse, Responder};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::core::balance::{leave_balances, PolicyBalance};
use crate::model::leave::LeaveApplication;
use crate::model::leave_group::LeavePolicy;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    /// Must name a policy of the employee's leave group.
    #[schema(example = "annual")]
    pub leave_type: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "family trip", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 123)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveApplication>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BalanceQuery {
    /// Defaults to the caller's own employee profile.
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Reference date (YYYY-MM-DD) defining the calendar year; defaults to
    /// today. A malformed value is logged and ignored.
    #[schema(example = "2026-06-01")]
    pub as_of: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    pub balances: Vec<PolicyBalance>,
}

/// Policies of the employee's assigned leave group. An employee without a
/// group (or an unknown employee id) yields an empty set, not an error.
pub(crate) async fn employee_policies(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Vec<LeavePolicy>, sqlx::Error> {
    sqlx::query_as::<_, LeavePolicy>(
        r#"
        SELECT lp.id, lp.group_id, lp.leave_type, lp.allowed_days
        FROM employees e
        JOIN leave_policies lp ON lp.group_id = e.leave_group_id
        WHERE e.id = ?
        ORDER BY lp.id
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
}

fn parse_as_of(raw: Option<&str>) -> NaiveDate {
    match raw {
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(error = %e, as_of = s, "Unparsable as_of date, using today");
                Utc::now().date_naive()
            }
        },
        None => Utc::now().date_naive(),
    }
}

/* =========================
Create leave application
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave application payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave application submitted",
         body = Object,
         example = json!({
            "message": "Leave application submitted",
            "status": "pending"
         })
        ),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.own_employee_id()?;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    // The requested type must exist in the employee's leave group.
    let policies = employee_policies(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to load leave policies");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if policies.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No leave group assigned to this employee"
        })));
    }

    let leave_type = payload.leave_type.trim().to_lowercase();
    if !policies.iter().any(|p| p.leave_type == leave_type) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave type is not part of your leave group"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO leave_applications
            (employee_id, leave_type, start_date, end_date, status, reason)
        VALUES (?, ?, ?, ?, 'pending', ?)
        "#,
    )
    .bind(employee_id)
    .bind(&leave_type)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave application");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave application submitted",
        "status": "pending"
    })))
}

async fn set_leave_status(
    pool: &MySqlPool,
    leave_id: u64,
    status: &str,
) -> actix_web::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE leave_applications
        SET status = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(status)
    .bind(leave_id)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, status, "Leave status update failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(result.rows_affected() > 0)
}

/* =========================
Approve leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 400, description = "Leave application not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();

    if !set_leave_status(pool.get_ref(), leave_id, "approved").await? {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave application not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave approved"
    })))
}

/* =========================
Reject leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 400, description = "Leave application not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();

    if !set_leave_status(pool.get_ref(), leave_id, "rejected").await? {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave application not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave rejected"
    })))
}

/// One leave application. Owners, their supervisor and HR/Admin may read.
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to fetch")
    ),
    responses(
        (status = 200, description = "Leave application found", body = LeaveApplication),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave application not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveApplication>(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date, status, reason, created_at
        FROM leave_applications
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave application");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match leave {
        Some(data) => {
            super::check_visibility(&auth, pool.get_ref(), data.employee_id).await?;
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave application not found"
        }))),
    }
}

/// Paginated leave application list.
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // Non-HR callers only ever see a single employee's applications:
    // their own, or (for supervisors) one of their reports.
    let employee_filter: Option<u64> = if auth.sees_everyone() {
        query.employee_id
    } else if let Some(target) = query.employee_id {
        super::check_visibility(&auth, pool.get_ref(), target).await?;
        Some(target)
    } else {
        Some(auth.own_employee_id()?)
    };

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = employee_filter {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_applications{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave applications");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date, status, reason, created_at
        FROM leave_applications
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveApplication>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let applications = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: applications,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Leave balances per policy of the employee's group, for the calendar
/// year of `as_of`. Runs the pure calculator over a snapshot of the
/// employee's policies and applications.
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Per-policy balances", body = BalanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match query.employee_id {
        Some(target) => {
            super::check_visibility(&auth, pool.get_ref(), target).await?;
            target
        }
        None => auth.own_employee_id()?,
    };

    let as_of = parse_as_of(query.as_of.as_deref());

    let policies = employee_policies(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to load leave policies");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // All statuses; the calculator itself ignores everything that is not
    // approved.
    let applications = sqlx::query_as::<_, LeaveApplication>(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date, status, reason, created_at
        FROM leave_applications
        WHERE employee_id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to load leave applications");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        employee_id,
        year: as_of.year(),
        balances: leave_balances(&policies, &applications, as_of),
    }))
}
