//! Employee record route handlers
//!
//! List and mutate employee rows plus the dropdown feeds the record
//! form needs (departments, grades, linkable accounts).

use crate::db::queries::{
    DELETE_EMPLOYEE, GET_EMPLOYEE_DETAIL, INSERT_EMPLOYEE, LIST_DEPARTMENT_OPTIONS,
    LIST_EMPLOYEES, LIST_EMPLOYEE_ROLE_USERS, LIST_GRADE_OPTIONS, UPDATE_EMPLOYEE,
};
use crate::error::{validation_error, ApiResult, AppError};
use crate::models::{
    DepartmentOption, EmployeeListItem, EmployeeRecord, EmployeeRequest, EmployeeUserOption,
    GradeOption, MessageResponse,
};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tokio_postgres::error::SqlState;
use tracing::{debug, info};
use validator::Validate;

fn reference_error(e: tokio_postgres::Error) -> AppError {
    if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
        validation_error("userId, deptId and gradeId must reference existing rows")
    } else {
        AppError::Database(e)
    }
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<EmployeeListItem>>> {
    let client = state.db_pool.get().await?;
    let rows = client.query(LIST_EMPLOYEES, &[]).await?;

    let employees = rows
        .iter()
        .map(|row| EmployeeListItem {
            employee_id: row.get(0),
            user_name: row.get(1),
            dept_name: row.get(2),
            grade_name: row.get(3),
            hire_date: row.get(4),
        })
        .collect();

    Ok(Json(employees))
}

/// POST /api/employees
///
/// Returns the raw stored row rather than the joined view.
pub async fn create_employee(
    State(state): State<SharedState>,
    Json(payload): Json<EmployeeRequest>,
) -> ApiResult<(StatusCode, Json<EmployeeRecord>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let client = state.db_pool.get().await?;
    let row = client
        .query_one(
            INSERT_EMPLOYEE,
            &[
                &payload.user_id,
                &payload.dept_id,
                &payload.grade_id,
                &payload.hire_date,
            ],
        )
        .await
        .map_err(reference_error)?;

    let record = EmployeeRecord {
        employee_id: row.get(0),
        user_id: row.get(1),
        dept_id: row.get(2),
        grade_id: row.get(3),
        hire_date: row.get(4),
    };
    info!("🧾 Employee {} created", record.employee_id);

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/employees/{id}
///
/// Returns the joined view of the updated row.
pub async fn update_employee(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Json(payload): Json<EmployeeRequest>,
) -> ApiResult<Json<EmployeeListItem>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let client = state.db_pool.get().await?;
    let affected = client
        .execute(
            UPDATE_EMPLOYEE,
            &[
                &payload.user_id,
                &payload.dept_id,
                &payload.grade_id,
                &payload.hire_date,
                &id,
            ],
        )
        .await
        .map_err(reference_error)?;

    if affected == 0 {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    let row = client.query_one(GET_EMPLOYEE_DETAIL, &[&id]).await?;
    info!("✏️ Employee {} updated", id);

    Ok(Json(EmployeeListItem {
        employee_id: row.get(0),
        user_name: row.get(1),
        dept_name: row.get(2),
        grade_name: row.get(3),
        hire_date: row.get(4),
    }))
}

/// DELETE /api/employees/{id}
pub async fn delete_employee(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let client = state.db_pool.get().await?;
    let affected = client.execute(DELETE_EMPLOYEE, &[&id]).await?;

    if affected == 0 {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }
    info!("🗑️ Employee {} deleted", id);

    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}

/// GET /api/employees/departments
pub async fn department_options(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<DepartmentOption>>> {
    let client = state.db_pool.get().await?;
    let rows = client.query(LIST_DEPARTMENT_OPTIONS, &[]).await?;
    debug!("Fetched {} department options", rows.len());

    let options = rows
        .iter()
        .map(|row| DepartmentOption {
            id: row.get(0),
            name: row.get(1),
        })
        .collect();

    Ok(Json(options))
}

/// GET /api/employees/grades
pub async fn grade_options(State(state): State<SharedState>) -> ApiResult<Json<Vec<GradeOption>>> {
    let client = state.db_pool.get().await?;
    let rows = client.query(LIST_GRADE_OPTIONS, &[]).await?;

    let options = rows
        .iter()
        .map(|row| GradeOption {
            id: row.get(0),
            name: row.get(1),
            basic_salary: row.get(2),
            bonus: row.get(3),
        })
        .collect();

    Ok(Json(options))
}

/// GET /api/employees/users/employees
///
/// Accounts carrying the employee role, for the link-account dropdown.
pub async fn employee_role_users(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<EmployeeUserOption>>> {
    let client = state.db_pool.get().await?;
    let rows = client.query(LIST_EMPLOYEE_ROLE_USERS, &[]).await?;

    let users = rows
        .iter()
        .map(|row| EmployeeUserOption {
            id: row.get(0),
            name: row.get(1),
            email: row.get(2),
        })
        .collect();

    Ok(Json(users))
}
