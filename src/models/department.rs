//! Department models and DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Department with its headcount
#[derive(Debug, Serialize)]
pub struct DepartmentWithCount {
    #[serde(rename = "Dept_Id")]
    pub dept_id: i32,
    #[serde(rename = "Dept_Name")]
    pub dept_name: String,
    #[serde(rename = "Total_Employees")]
    pub total_employees: i64,
}

/// Request to create or rename a department
#[derive(Debug, Deserialize, Validate)]
pub struct DepartmentRequest {
    #[serde(rename = "Dept_Name")]
    #[validate(length(min = 1, message = "Department name is required"))]
    pub dept_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_original_field_name() {
        let request: DepartmentRequest =
            serde_json::from_str(r#"{"Dept_Name": "Finance"}"#).unwrap();
        assert_eq!(request.dept_name, "Finance");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let request: DepartmentRequest = serde_json::from_str(r#"{"Dept_Name": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
