//! Grade models and DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Grade with how many employees currently hold it
#[derive(Debug, Serialize)]
pub struct GradeWithCount {
    #[serde(rename = "Grade_Id")]
    pub grade_id: i32,
    #[serde(rename = "Grade_Name")]
    pub grade_name: String,
    #[serde(rename = "Basic_Salary")]
    pub basic_salary: f64,
    #[serde(rename = "Grade_Bonus")]
    pub grade_bonus: f64,
    #[serde(rename = "Employee_Count")]
    pub employee_count: i64,
}

/// Bare grade row
#[derive(Debug, Serialize)]
pub struct GradeRecord {
    #[serde(rename = "Grade_Id")]
    pub grade_id: i32,
    #[serde(rename = "Grade_Name")]
    pub grade_name: String,
    #[serde(rename = "Basic_Salary")]
    pub basic_salary: f64,
    #[serde(rename = "Grade_Bonus")]
    pub grade_bonus: f64,
}

/// Single grade with the employees holding it
#[derive(Debug, Serialize)]
pub struct GradeDetail {
    #[serde(rename = "Grade_Id")]
    pub grade_id: i32,
    #[serde(rename = "Grade_Name")]
    pub grade_name: String,
    #[serde(rename = "Basic_Salary")]
    pub basic_salary: f64,
    #[serde(rename = "Grade_Bonus")]
    pub grade_bonus: f64,
    #[serde(rename = "Employees")]
    pub employees: Vec<GradeEmployee>,
}

#[derive(Debug, Serialize)]
pub struct GradeEmployee {
    #[serde(rename = "Employee_Id")]
    pub employee_id: i32,
    #[serde(rename = "User_Name")]
    pub user_name: String,
    #[serde(rename = "E_mail")]
    pub email: String,
}

/// Request to create or update a grade
#[derive(Debug, Deserialize, Validate)]
pub struct GradeRequest {
    #[serde(rename = "Grade_Name")]
    #[validate(length(min = 1, message = "Grade_Name is required"))]
    pub grade_name: String,
    #[serde(rename = "Basic_Salary")]
    #[validate(range(min = 0.0, message = "Basic_Salary must be a valid positive number"))]
    pub basic_salary: f64,
    #[serde(rename = "Grade_Bonus")]
    #[validate(range(min = 0.0, message = "Grade_Bonus must be a valid positive number"))]
    pub grade_bonus: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_original_field_names() {
        let request: GradeRequest = serde_json::from_str(
            r#"{"Grade_Name": "Senior", "Basic_Salary": 90000, "Grade_Bonus": 5000}"#,
        )
        .unwrap();
        assert_eq!(request.grade_name, "Senior");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_salary_rejected() {
        let request: GradeRequest = serde_json::from_str(
            r#"{"Grade_Name": "Senior", "Basic_Salary": -1, "Grade_Bonus": 0}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
