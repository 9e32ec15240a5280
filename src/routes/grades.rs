//! Grade route handlers
//!
//! Grades carry the pay structure, so deletion is refused while any
//! employee still holds the grade.

use crate::db::queries::{
    COUNT_EMPLOYEES_IN_GRADE, DELETE_GRADE, GET_GRADE, GET_GRADE_EMPLOYEES, INSERT_GRADE,
    LIST_GRADES_WITH_COUNTS, UPDATE_GRADE,
};
use crate::error::{validation_error, ApiResult, AppError};
use crate::models::{
    GradeDetail, GradeEmployee, GradeRecord, GradeRequest, GradeWithCount, MessageResponse,
};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;
use validator::Validate;

/// Delete refusal carries the blocking headcount
#[derive(Debug, Serialize)]
struct GradeDeleteBlocked {
    error: String,
    #[serde(rename = "employeeCount")]
    employee_count: i64,
}

fn grade_record(row: &tokio_postgres::Row) -> GradeRecord {
    GradeRecord {
        grade_id: row.get(0),
        grade_name: row.get(1),
        basic_salary: row.get(2),
        grade_bonus: row.get(3),
    }
}

/// GET /api/grades
pub async fn list_grades(State(state): State<SharedState>) -> ApiResult<Json<Vec<GradeWithCount>>> {
    let client = state.db_pool.get().await?;
    let rows = client.query(LIST_GRADES_WITH_COUNTS, &[]).await?;

    let grades = rows
        .iter()
        .map(|row| GradeWithCount {
            grade_id: row.get(0),
            grade_name: row.get(1),
            basic_salary: row.get(2),
            grade_bonus: row.get(3),
            employee_count: row.get(4),
        })
        .collect();

    Ok(Json(grades))
}

/// GET /api/grades/{id}
///
/// Single grade with the employees currently holding it.
pub async fn get_grade(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<GradeDetail>> {
    let client = state.db_pool.get().await?;

    let row = client
        .query_opt(GET_GRADE, &[&id])
        .await?
        .ok_or_else(|| AppError::NotFound("Grade not found".to_string()))?;

    let employees = client
        .query(GET_GRADE_EMPLOYEES, &[&id])
        .await?
        .iter()
        .map(|r| GradeEmployee {
            employee_id: r.get(0),
            user_name: r.get(1),
            email: r.get(2),
        })
        .collect();

    Ok(Json(GradeDetail {
        grade_id: row.get(0),
        grade_name: row.get(1),
        basic_salary: row.get(2),
        grade_bonus: row.get(3),
        employees,
    }))
}

/// POST /api/grades
pub async fn create_grade(
    State(state): State<SharedState>,
    Json(payload): Json<GradeRequest>,
) -> ApiResult<(StatusCode, Json<GradeRecord>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let client = state.db_pool.get().await?;
    let row = client
        .query_one(
            INSERT_GRADE,
            &[
                &payload.grade_name,
                &payload.basic_salary,
                &payload.grade_bonus,
            ],
        )
        .await?;
    info!("🏅 Grade '{}' created", payload.grade_name);

    Ok((StatusCode::CREATED, Json(grade_record(&row))))
}

/// PUT /api/grades/{id}
pub async fn update_grade(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Json(payload): Json<GradeRequest>,
) -> ApiResult<Json<GradeRecord>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let client = state.db_pool.get().await?;
    let row = client
        .query_opt(
            UPDATE_GRADE,
            &[
                &payload.grade_name,
                &payload.basic_salary,
                &payload.grade_bonus,
                &id,
            ],
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Grade not found".to_string()))?;
    info!("✏️ Grade {} updated", id);

    Ok(Json(grade_record(&row)))
}

/// DELETE /api/grades/{id}
///
/// Refusal echoes how many employees block the deletion.
pub async fn delete_grade(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    let client = state.db_pool.get().await?;

    if client.query_opt(GET_GRADE, &[&id]).await?.is_none() {
        return Err(AppError::NotFound("Grade not found".to_string()));
    }

    let count_row = client.query_one(COUNT_EMPLOYEES_IN_GRADE, &[&id]).await?;
    let employee_count: i64 = count_row.get(0);
    if employee_count > 0 {
        let body = GradeDeleteBlocked {
            error: format!(
                "Cannot delete grade. {} employee(s) are assigned to this grade.",
                employee_count
            ),
            employee_count,
        };
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    client.execute(DELETE_GRADE, &[&id]).await?;
    info!("🗑️ Grade {} deleted", id);

    Ok(Json(MessageResponse::new("Grade deleted successfully")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_blocked_body_shape() {
        let body = serde_json::to_value(GradeDeleteBlocked {
            error: "Cannot delete grade. 3 employee(s) are assigned to this grade.".to_string(),
            employee_count: 3,
        })
        .unwrap();
        assert_eq!(body["employeeCount"], 3);
        assert!(body["error"].as_str().unwrap().contains("3 employee(s)"));
    }
}
