//! Salary record route handlers
//!
//! The payroll screens identify records by a SAL-prefixed display id
//! and by employee display name, so mutations resolve the name to an
//! employee row before touching the Salary table.

use crate::db::queries::{
    DELETE_SALARY, FIND_EMPLOYEE_ID_BY_USER_ID, FIND_USER_ID_BY_NAME, INSERT_SALARY,
    LIST_SALARIES, LIST_SALARY_EMPLOYEES, UPDATE_SALARY,
};
use crate::error::{validation_error, ApiResult, AppError};
use crate::models::{
    format_salary_id, parse_salary_id, MessageResponse, SalaryEmployeeOption, SalaryListItem,
    SalaryRequest,
};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use deadpool_postgres::Object;
use tracing::info;
use validator::Validate;

/// Resolve a display name to the employee primary key. The two
/// failure cases answer differently so the form can tell an unknown
/// name from an account without an employee record.
async fn resolve_employee_id(client: &Object, employee_name: &str) -> Result<i32, AppError> {
    let user_row = client
        .query_opt(FIND_USER_ID_BY_NAME, &[&employee_name])
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    let user_id: i32 = user_row.get(0);

    let employee_row = client
        .query_opt(FIND_EMPLOYEE_ID_BY_USER_ID, &[&user_id])
        .await?
        .ok_or_else(|| AppError::NotFound("Employee record not found".to_string()))?;
    Ok(employee_row.get(0))
}

fn numeric_salary_id(raw: &str) -> Result<i32, AppError> {
    parse_salary_id(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid salary id '{}'", raw)))
}

/// GET /api/salaries
pub async fn list_salaries(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<SalaryListItem>>> {
    let client = state.db_pool.get().await?;
    let rows = client.query(LIST_SALARIES, &[]).await?;

    let salaries = rows
        .iter()
        .map(|row| SalaryListItem {
            salary_id: format_salary_id(row.get(0)),
            employee_name: row.get(1),
            salary: row.get(2),
            pay_date: row.get(3),
        })
        .collect();

    Ok(Json(salaries))
}

/// GET /api/salaries/employees
pub async fn salary_employee_options(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<SalaryEmployeeOption>>> {
    let client = state.db_pool.get().await?;
    let rows = client.query(LIST_SALARY_EMPLOYEES, &[]).await?;

    let employees = rows
        .iter()
        .map(|row| SalaryEmployeeOption {
            id: row.get(0),
            name: row.get(1),
        })
        .collect();

    Ok(Json(employees))
}

/// POST /api/salaries
pub async fn create_salary(
    State(state): State<SharedState>,
    Json(payload): Json<SalaryRequest>,
) -> ApiResult<(StatusCode, Json<SalaryListItem>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let client = state.db_pool.get().await?;
    let employee_id = resolve_employee_id(&client, &payload.employee_name).await?;

    let row = client
        .query_one(
            INSERT_SALARY,
            &[&employee_id, &payload.salary, &payload.pay_date],
        )
        .await?;
    let salary_id: i32 = row.get(0);
    info!("💰 Salary {} recorded for employee {}", salary_id, employee_id);

    Ok((
        StatusCode::CREATED,
        Json(SalaryListItem {
            salary_id: format_salary_id(salary_id),
            employee_name: payload.employee_name,
            salary: payload.salary,
            pay_date: payload.pay_date,
        }),
    ))
}

/// PUT /api/salaries/{id}
pub async fn update_salary(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<SalaryRequest>,
) -> ApiResult<Json<SalaryListItem>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;
    let salary_id = numeric_salary_id(&id)?;

    let client = state.db_pool.get().await?;
    let employee_id = resolve_employee_id(&client, &payload.employee_name).await?;

    let updated = client
        .query_opt(
            UPDATE_SALARY,
            &[&employee_id, &payload.salary, &payload.pay_date, &salary_id],
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Salary record not found".to_string()))?;
    let salary_id: i32 = updated.get(0);
    info!("✏️ Salary {} updated", salary_id);

    Ok(Json(SalaryListItem {
        salary_id: format_salary_id(salary_id),
        employee_name: payload.employee_name,
        salary: payload.salary,
        pay_date: payload.pay_date,
    }))
}

/// DELETE /api/salaries/{id}
pub async fn delete_salary(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let salary_id = numeric_salary_id(&id)?;

    let client = state.db_pool.get().await?;
    let affected = client.execute(DELETE_SALARY, &[&salary_id]).await?;
    if affected == 0 {
        return Err(AppError::NotFound("Salary record not found".to_string()));
    }
    info!("🗑️ Salary {} deleted", salary_id);

    Ok(Json(MessageResponse::new(
        "Salary record deleted successfully",
    )))
}
