pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod leave_group;

use crate::auth::auth::AuthUser;
use sqlx::MySqlPool;

/// Active employees reporting to the given supervisor.
pub(crate) async fn supervised_ids(
    pool: &MySqlPool,
    supervisor_employee_id: u64,
) -> Result<Vec<u64>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (u64,)>(
        r#"
        SELECT id
        FROM employees
        WHERE supervisor_id = ?
        AND status = 'active'
        "#,
    )
    .bind(supervisor_employee_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// May the caller read leave/attendance data of `target`? HR/Admin see
/// everyone, everyone sees themselves, supervisors see their reports.
pub(crate) async fn check_visibility(
    auth: &AuthUser,
    pool: &MySqlPool,
    target: u64,
) -> actix_web::Result<()> {
    if auth.sees_everyone() || auth.employee_id == Some(target) {
        return Ok(());
    }

    if auth.is_supervisor() {
        let own = auth.own_employee_id()?;
        let reports = supervised_ids(pool, own).await.map_err(|e| {
            tracing::error!(error = %e, supervisor = own, "Failed to resolve supervised employees");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
        if reports.contains(&target) {
            return Ok(());
        }
    }

    Err(actix_web::error::ErrorForbidden(
        "Not authorized for this employee",
    ))
}
