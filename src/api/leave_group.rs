use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::leave_group::{LeaveGroup, LeavePolicy};

#[derive(Deserialize, ToSchema)]
pub struct PolicyInput {
    #[schema(example = "annual")]
    pub leave_type: String,
    #[schema(example = 14)]
    pub allowed_days: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveGroup {
    #[schema(example = "Head Office Staff")]
    pub name: String,
    pub policies: Vec<PolicyInput>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveGroupDetail {
    pub group: LeaveGroup,
    pub policies: Vec<LeavePolicy>,
}

/// Create a leave group together with its policies (HR/Admin). Policy
/// names are normalized to lowercase, matching how applications store
/// their leave type.
#[utoipa::path(
    post,
    path = "/api/v1/leave-groups",
    request_body = CreateLeaveGroup,
    responses(
        (status = 201, description = "Leave group created"),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveGroup"
)]
pub async fn create_leave_group(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveGroup>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Group name must not be empty"
        })));
    }

    if payload.policies.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "A leave group needs at least one policy"
        })));
    }

    let mut seen = Vec::with_capacity(payload.policies.len());
    for policy in &payload.policies {
        let leave_type = policy.leave_type.trim().to_lowercase();
        if leave_type.is_empty() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Policy leave_type must not be empty"
            })));
        }
        if policy.allowed_days < 0 {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "allowed_days cannot be negative"
            })));
        }
        if seen.contains(&leave_type) {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": format!("Duplicate leave type in group: {}", leave_type)
            })));
        }
        seen.push(leave_type);
    }

    // Group and policies land atomically.
    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let group = sqlx::query("INSERT INTO leave_groups (name) VALUES (?)")
        .bind(name)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to insert leave group");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let group_id = group.last_insert_id();

    for (policy, leave_type) in payload.policies.iter().zip(&seen) {
        sqlx::query(
            r#"
            INSERT INTO leave_policies (group_id, leave_type, allowed_days)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(group_id)
        .bind(leave_type)
        .bind(policy.allowed_days)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, group_id, "Failed to insert leave policy");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to commit leave group");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave group created",
        "id": group_id
    })))
}

/// List leave groups.
#[utoipa::path(
    get,
    path = "/api/v1/leave-groups",
    responses(
        (status = 200, description = "Leave group list", body = [LeaveGroup]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveGroup"
)]
pub async fn list_leave_groups(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let groups = sqlx::query_as::<_, LeaveGroup>("SELECT id, name FROM leave_groups ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave groups");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(groups))
}

/// One leave group with its policies.
#[utoipa::path(
    get,
    path = "/api/v1/leave-groups/{group_id}",
    params(
        ("group_id" = u64, Path, description = "Leave group ID")
    ),
    responses(
        (status = 200, description = "Leave group found", body = LeaveGroupDetail),
        (status = 404, description = "Leave group not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveGroup"
)]
pub async fn get_leave_group(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let group_id = path.into_inner();

    let group = sqlx::query_as::<_, LeaveGroup>("SELECT id, name FROM leave_groups WHERE id = ?")
        .bind(group_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, group_id, "Failed to fetch leave group");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let group = match group {
        Some(g) => g,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Leave group not found"
            })));
        }
    };

    let policies = sqlx::query_as::<_, LeavePolicy>(
        r#"
        SELECT id, group_id, leave_type, allowed_days
        FROM leave_policies
        WHERE group_id = ?
        ORDER BY id
        "#,
    )
    .bind(group_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, group_id, "Failed to fetch leave policies");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(LeaveGroupDetail { group, policies }))
}

/// Assign a leave group to an employee (HR/Admin).
#[utoipa::path(
    put,
    path = "/api/v1/leave-groups/{group_id}/assign/{employee_id}",
    params(
        ("group_id" = u64, Path, description = "Leave group ID"),
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Leave group assigned"),
        (status = 404, description = "Leave group or employee not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveGroup"
)]
pub async fn assign_leave_group(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, u64)>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let (group_id, employee_id) = path.into_inner();

    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM leave_groups WHERE id = ?",
    )
    .bind(group_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, group_id, "Failed to check leave group");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if exists == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave group not found"
        })));
    }

    let result = sqlx::query("UPDATE employees SET leave_group_id = ? WHERE id = ?")
        .bind(group_id)
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, group_id, employee_id, "Failed to assign leave group");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave group assigned"
    })))
}
