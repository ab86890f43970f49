use crate::api::attendance::{EmployeeSummary, RecordAttendance, SummaryQuery, SummaryResponse};
use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::holiday::{CreateHoliday, HolidayFilter};
use crate::api::leave::{
    BalanceQuery, BalanceResponse, CreateLeave, LeaveFilter, LeaveListResponse,
};
use crate::api::leave_group::{CreateLeaveGroup, LeaveGroupDetail, PolicyInput};
use crate::core::balance::PolicyBalance;
use crate::core::period::PeriodTotals;
use crate::model::attendance::{AttendanceFlag, AttendanceRecord};
use crate::model::employee::Employee;
use crate::model::holiday::Holiday;
use crate::model::leave::{LeaveApplication, LeaveStatus};
use crate::model::leave_group::{LeaveGroup, LeavePolicy};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Staffdesk API",
        version = "1.0.0",
        description = r#"
## Leave & attendance service

This API powers the leave and attendance side of an HR system.

### Key Features
- **Leave groups** — named bundles of per-type yearly allowances, assigned to employees
- **Leave applications** — submit, approve/reject, list with filters
- **Leave balances** — per-policy used/remaining days within the calendar year
- **Attendance** — daily flag capture and weekly/monthly bucket summaries
- **Holidays** — company-wide holiday intervals feeding the summaries

### Security
Endpoints are protected using **JWT Bearer authentication**; sensitive
operations require the **Admin** or **HR** role, supervisors see their
reports only.

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::create_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::leave_balance,

        crate::api::leave_group::create_leave_group,
        crate::api::leave_group::list_leave_groups,
        crate::api::leave_group::get_leave_group,
        crate::api::leave_group::assign_leave_group,

        crate::api::holiday::create_holiday,
        crate::api::holiday::list_holidays,
        crate::api::holiday::delete_holiday,

        crate::api::attendance::record_attendance,
        crate::api::attendance::attendance_summary,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee
    ),
    components(
        schemas(
            LeaveStatus,
            LeaveApplication,
            LeaveFilter,
            LeaveListResponse,
            CreateLeave,
            BalanceQuery,
            BalanceResponse,
            PolicyBalance,
            LeaveGroup,
            LeavePolicy,
            LeaveGroupDetail,
            CreateLeaveGroup,
            PolicyInput,
            Holiday,
            CreateHoliday,
            HolidayFilter,
            AttendanceFlag,
            AttendanceRecord,
            RecordAttendance,
            SummaryQuery,
            SummaryResponse,
            EmployeeSummary,
            PeriodTotals,
            Employee,
            CreateEmployee,
            EmployeeListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave application and balance APIs"),
        (name = "LeaveGroup", description = "Leave group and policy APIs"),
        (name = "Holiday", description = "Company holiday APIs"),
        (name = "Attendance", description = "Attendance capture and summary APIs"),
        (name = "Employee", description = "Employee management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
