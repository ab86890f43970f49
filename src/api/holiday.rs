use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::holiday::Holiday;

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "Eid")]
    pub name: String,
    #[schema(example = "2026-03-20", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-22", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HolidayFilter {
    /// Restrict to holidays overlapping this calendar year.
    #[schema(example = 2026)]
    pub year: Option<i32>,
}

/// Create a company-wide holiday interval (HR/Admin).
#[utoipa::path(
    post,
    path = "/api/v1/holidays",
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created"),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn create_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Holiday name must not be empty"
        })));
    }

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO holidays (name, start_date, end_date)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(payload.name.trim())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to create holiday");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Holiday created"
    })))
}

/// List holidays, optionally only those overlapping a given year.
#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    params(HolidayFilter),
    responses(
        (status = 200, description = "Holiday list", body = [Holiday]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn list_holidays(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HolidayFilter>,
) -> actix_web::Result<impl Responder> {
    let holidays = match query.year {
        Some(year) => {
            let year_start = NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| actix_web::error::ErrorBadRequest("Invalid year"))?;
            let year_end = NaiveDate::from_ymd_opt(year, 12, 31)
                .ok_or_else(|| actix_web::error::ErrorBadRequest("Invalid year"))?;

            sqlx::query_as::<_, Holiday>(
                r#"
                SELECT id, name, start_date, end_date
                FROM holidays
                WHERE start_date <= ?
                AND end_date >= ?
                ORDER BY start_date
                "#,
            )
            .bind(year_end)
            .bind(year_start)
            .fetch_all(pool.get_ref())
            .await
        }
        None => {
            sqlx::query_as::<_, Holiday>(
                r#"
                SELECT id, name, start_date, end_date
                FROM holidays
                ORDER BY start_date
                "#,
            )
            .fetch_all(pool.get_ref())
            .await
        }
    }
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch holidays");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(holidays))
}

/// Delete a holiday (HR/Admin).
#[utoipa::path(
    delete,
    path = "/api/v1/holidays/{holiday_id}",
    params(
        ("holiday_id" = u64, Path, description = "Holiday ID")
    ),
    responses(
        (status = 200, description = "Holiday deleted"),
        (status = 404, description = "Holiday not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn delete_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let holiday_id = path.into_inner();

    let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
        .bind(holiday_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, holiday_id, "Failed to delete holiday");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Holiday not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Holiday deleted"
    })))
}
