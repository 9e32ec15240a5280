//! Dashboard aggregate route handler

use crate::db::queries::{
    COUNT_DEPARTMENTS, COUNT_EMPLOYEES, COUNT_USERS, EMPLOYEES_BY_GRADE, SALARIES_BY_DEPARTMENT,
    SUM_SALARIES,
};
use crate::error::ApiResult;
use crate::state::SharedState;
use axum::{extract::State, Json};
use serde::Serialize;

/// One slice of a dashboard chart
#[derive(Debug, Serialize)]
pub struct ChartPoint<T: Serialize> {
    pub name: String,
    pub value: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_users: i64,
    pub total_employees: i64,
    pub total_departments: i64,
    pub total_salaries_paid: f64,
    pub salaries_by_dept: Vec<ChartPoint<f64>>,
    pub employees_by_grade: Vec<ChartPoint<i64>>,
}

/// GET /api/dashboard
///
/// Headline counts plus the two chart series the overview page draws.
pub async fn dashboard(State(state): State<SharedState>) -> ApiResult<Json<DashboardResponse>> {
    let client = state.db_pool.get().await?;

    let total_users: i64 = client.query_one(COUNT_USERS, &[]).await?.get(0);
    let total_employees: i64 = client.query_one(COUNT_EMPLOYEES, &[]).await?.get(0);
    let total_departments: i64 = client.query_one(COUNT_DEPARTMENTS, &[]).await?.get(0);
    let total_salaries_paid: f64 = client.query_one(SUM_SALARIES, &[]).await?.get(0);

    let salaries_by_dept = client
        .query(SALARIES_BY_DEPARTMENT, &[])
        .await?
        .iter()
        .map(|row| ChartPoint {
            name: row.get(0),
            value: row.get::<_, f64>(1),
        })
        .collect();

    let employees_by_grade = client
        .query(EMPLOYEES_BY_GRADE, &[])
        .await?
        .iter()
        .map(|row| ChartPoint {
            name: row.get(0),
            value: row.get::<_, i64>(1),
        })
        .collect();

    Ok(Json(DashboardResponse {
        total_users,
        total_employees,
        total_departments,
        total_salaries_paid,
        salaries_by_dept,
        employees_by_grade,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_uses_camel_case_keys() {
        let body = serde_json::to_value(DashboardResponse {
            total_users: 10,
            total_employees: 8,
            total_departments: 3,
            total_salaries_paid: 125000.0,
            salaries_by_dept: vec![ChartPoint {
                name: "Engineering".to_string(),
                value: 90000.0,
            }],
            employees_by_grade: vec![ChartPoint {
                name: "Senior".to_string(),
                value: 4,
            }],
        })
        .unwrap();
        assert_eq!(body["totalUsers"], 10);
        assert_eq!(body["totalSalariesPaid"], 125000.0);
        assert_eq!(body["salariesByDept"][0]["name"], "Engineering");
        assert_eq!(body["employeesByGrade"][0]["value"], 4);
    }
}
