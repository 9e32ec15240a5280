//! Department route handlers

use crate::db::queries::{
    COUNT_EMPLOYEES_IN_DEPARTMENT, DELETE_DEPARTMENT, GET_DEPARTMENT_WITH_COUNT,
    INSERT_DEPARTMENT, LIST_DEPARTMENTS_WITH_COUNTS, UPDATE_DEPARTMENT,
};
use crate::error::{validation_error, ApiResult, AppError};
use crate::models::{DepartmentRequest, DepartmentWithCount, MessageResponse};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

fn clean_name(payload: &DepartmentRequest) -> Result<&str, AppError> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;
    let name = payload.dept_name.trim();
    if name.is_empty() {
        return Err(validation_error("Department name is required"));
    }
    Ok(name)
}

/// GET /api/departments
pub async fn list_departments(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<DepartmentWithCount>>> {
    let client = state.db_pool.get().await?;
    let rows = client.query(LIST_DEPARTMENTS_WITH_COUNTS, &[]).await?;

    let departments = rows
        .iter()
        .map(|row| DepartmentWithCount {
            dept_id: row.get(0),
            dept_name: row.get(1),
            total_employees: row.get(2),
        })
        .collect();

    Ok(Json(departments))
}

/// POST /api/departments
pub async fn create_department(
    State(state): State<SharedState>,
    Json(payload): Json<DepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentWithCount>)> {
    let name = clean_name(&payload)?;

    let client = state.db_pool.get().await?;
    let row = client.query_one(INSERT_DEPARTMENT, &[&name]).await?;
    let dept_id: i32 = row.get(0);
    info!("🏢 Department '{}' created", name);

    Ok((
        StatusCode::CREATED,
        Json(DepartmentWithCount {
            dept_id,
            dept_name: name.to_string(),
            total_employees: 0,
        }),
    ))
}

/// PUT /api/departments/{id}
pub async fn update_department(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Json(payload): Json<DepartmentRequest>,
) -> ApiResult<Json<DepartmentWithCount>> {
    let name = clean_name(&payload)?;

    let client = state.db_pool.get().await?;
    let affected = client.execute(UPDATE_DEPARTMENT, &[&name, &id]).await?;
    if affected == 0 {
        return Err(AppError::NotFound("Department not found".to_string()));
    }

    let row = client.query_one(GET_DEPARTMENT_WITH_COUNT, &[&id]).await?;
    info!("✏️ Department {} renamed to '{}'", id, name);

    Ok(Json(DepartmentWithCount {
        dept_id: row.get(0),
        dept_name: row.get(1),
        total_employees: row.get(2),
    }))
}

/// DELETE /api/departments/{id}
///
/// Refused while employees still reference the department.
pub async fn delete_department(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let client = state.db_pool.get().await?;

    let count_row = client
        .query_one(COUNT_EMPLOYEES_IN_DEPARTMENT, &[&id])
        .await?;
    let employee_count: i64 = count_row.get(0);
    if employee_count > 0 {
        return Err(AppError::BadRequest(format!(
            "Cannot delete department. {} employee(s) are assigned to this department.",
            employee_count
        )));
    }

    let affected = client.execute(DELETE_DEPARTMENT, &[&id]).await?;
    if affected == 0 {
        return Err(AppError::NotFound("Department not found".to_string()));
    }
    info!("🗑️ Department {} deleted", id);

    Ok(Json(MessageResponse::new("Department deleted successfully")))
}
