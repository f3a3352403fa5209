use crate::api::admins::CreateAdmin;
use crate::api::attendance::{AttendanceListResponse, AttendanceRow};
use crate::api::dashboard::{DashboardSummary, RecentPunch};
use crate::api::devices::{CreateDevice, TestConnection};
use crate::api::employees::{CreateEmployee, EmployeeListResponse};
use crate::api::leaves::{CreateLeave, LeaveFilter, LeaveListResponse};
use crate::api::reports::{ReportResponse, ReportRow};
use crate::api::sync::SyncTarget;
use crate::model::admin_user::AdminUser;
use crate::model::attendance_record::PunchType;
use crate::model::device::Device;
use crate::model::employee::Employee;
use crate::model::leave::{Leave, LeaveType};
use crate::sync::SyncReport;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TimeTracker API",
        version = "1.0.0",
        description = r#"
## TimeTracker — Attendance & Biometric Terminal Sync

This API powers a small attendance-tracking backend that syncs employees and
punch events from fingerprint terminals on the local network.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, and view employee profiles
- **Device Sync**
  - Pull enrolled users and punch logs from a terminal, test connections
- **Attendance**
  - Browse punch records, daily first-in/last-out reports
- **Leave Management**
  - Apply for leave, approve/reject requests

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Write operations require the **Admin** or **Superadmin** role.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::dashboard::dashboard_summary,

        crate::api::employees::create_employee,
        crate::api::employees::get_employee,
        crate::api::employees::list_employees,
        crate::api::employees::update_employee,
        crate::api::employees::delete_employee,

        crate::api::attendance::list_attendance,

        crate::api::devices::list_devices,
        crate::api::devices::create_device,
        crate::api::devices::update_device,
        crate::api::devices::delete_device,
        crate::api::devices::test_device,

        crate::api::sync::sync_employees,
        crate::api::sync::sync_attendance,

        crate::api::leaves::leave_list,
        crate::api::leaves::get_leave,
        crate::api::leaves::create_leave,
        crate::api::leaves::approve_leave,
        crate::api::leaves::reject_leave,

        crate::api::reports::attendance_report,

        crate::api::admins::list_admins,
        crate::api::admins::create_admin,
        crate::api::admins::delete_admin,

        crate::api::system::database_stats
    ),
    components(
        schemas(
            DashboardSummary,
            RecentPunch,
            CreateEmployee,
            Employee,
            EmployeeListResponse,
            AttendanceRow,
            AttendanceListResponse,
            PunchType,
            CreateDevice,
            TestConnection,
            Device,
            SyncTarget,
            SyncReport,
            CreateLeave,
            LeaveFilter,
            LeaveListResponse,
            Leave,
            LeaveType,
            ReportRow,
            ReportResponse,
            CreateAdmin,
            AdminUser
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token APIs"),
        (name = "Dashboard", description = "Daily headline numbers"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Punch record APIs"),
        (name = "Device", description = "Terminal registry and connection tests"),
        (name = "Sync", description = "Pull users and punches from a terminal"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Report", description = "Attendance summaries"),
        (name = "Admin", description = "Admin account management"),
        (name = "System", description = "Database maintenance"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
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
