//! Employee models and DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Employee row as the list endpoints present it
#[derive(Debug, Serialize)]
pub struct EmployeeListItem {
    #[serde(rename = "Employee_Id")]
    pub employee_id: i32,
    #[serde(rename = "User_Name")]
    pub user_name: String,
    #[serde(rename = "Dept_Name")]
    pub dept_name: String,
    #[serde(rename = "Grade_Name")]
    pub grade_name: String,
    #[serde(rename = "Hire_Date")]
    pub hire_date: NaiveDate,
}

/// Raw employee row, returned after creation
#[derive(Debug, Serialize)]
pub struct EmployeeRecord {
    #[serde(rename = "Employee_Id")]
    pub employee_id: i32,
    #[serde(rename = "User_Id")]
    pub user_id: i32,
    #[serde(rename = "Dept_Id")]
    pub dept_id: i32,
    #[serde(rename = "Grade_Id")]
    pub grade_id: i32,
    #[serde(rename = "Hire_Date")]
    pub hire_date: NaiveDate,
}

/// Request to create or update an employee
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[validate(range(min = 1, message = "userId must be a valid id"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "deptId must be a valid id"))]
    pub dept_id: i32,
    #[validate(range(min = 1, message = "gradeId must be a valid id"))]
    pub grade_id: i32,
    pub hire_date: NaiveDate,
}

/// Department dropdown entry
#[derive(Debug, Serialize)]
pub struct DepartmentOption {
    pub id: i32,
    pub name: String,
}

/// Grade dropdown entry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeOption {
    pub id: i32,
    pub name: String,
    pub basic_salary: f64,
    pub bonus: f64,
}

/// Account dropdown entry for linking an employee record
#[derive(Debug, Serialize)]
pub struct EmployeeUserOption {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item_serializes_with_original_casing() {
        let item = EmployeeListItem {
            employee_id: 7,
            user_name: "Priya".to_string(),
            dept_name: "Engineering".to_string(),
            grade_name: "Senior".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["Employee_Id"], 7);
        assert_eq!(json["User_Name"], "Priya");
        assert_eq!(json["Hire_Date"], "2023-04-01");
    }

    #[test]
    fn test_request_accepts_camel_case_body() {
        let request: EmployeeRequest = serde_json::from_str(
            r#"{"userId": 3, "deptId": 1, "gradeId": 2, "hireDate": "2024-01-15"}"#,
        )
        .unwrap();
        assert_eq!(request.user_id, 3);
        assert_eq!(
            request.hire_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_zero_ids() {
        let request: EmployeeRequest = serde_json::from_str(
            r#"{"userId": 0, "deptId": 1, "gradeId": 2, "hireDate": "2024-01-15"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
