//! Salary models and DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Salary record as the list endpoint presents it
#[derive(Debug, Serialize)]
pub struct SalaryListItem {
    #[serde(rename = "Salary_Id")]
    pub salary_id: String,
    #[serde(rename = "Employee_Name")]
    pub employee_name: String,
    #[serde(rename = "Salary")]
    pub salary: f64,
    #[serde(rename = "Pay_Date")]
    pub pay_date: NaiveDate,
}

/// Employee dropdown entry for the salary form
#[derive(Debug, Serialize)]
pub struct SalaryEmployeeOption {
    pub id: i32,
    pub name: String,
}

/// Request to create or update a salary record
#[derive(Debug, Deserialize, Validate)]
pub struct SalaryRequest {
    #[serde(rename = "Employee_Name")]
    #[validate(length(min = 1, message = "Employee_Name is required"))]
    pub employee_name: String,
    #[serde(rename = "Salary")]
    #[validate(range(min = 0.0, message = "Salary must be a valid positive number"))]
    pub salary: f64,
    #[serde(rename = "Pay_Date")]
    pub pay_date: NaiveDate,
}

/// Display id format used by the payroll screens ("SAL007")
pub fn format_salary_id(id: i32) -> String {
    format!("SAL{:03}", id)
}

/// Parse a display id back to the numeric key; plain numbers pass through
pub fn parse_salary_id(id: &str) -> Option<i32> {
    id.strip_prefix("SAL").unwrap_or(id).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_salary_id_pads_to_three() {
        assert_eq!(format_salary_id(1), "SAL001");
        assert_eq!(format_salary_id(42), "SAL042");
        assert_eq!(format_salary_id(1234), "SAL1234");
    }

    #[test]
    fn test_parse_salary_id() {
        assert_eq!(parse_salary_id("SAL001"), Some(1));
        assert_eq!(parse_salary_id("SAL1234"), Some(1234));
        assert_eq!(parse_salary_id("17"), Some(17));
        assert_eq!(parse_salary_id("SALX"), None);
    }

    #[test]
    fn test_request_uses_original_field_names() {
        let request: SalaryRequest = serde_json::from_str(
            r#"{"Employee_Name": "Priya", "Salary": 95000.5, "Pay_Date": "2024-06-30"}"#,
        )
        .unwrap();
        assert_eq!(request.employee_name, "Priya");
        assert_eq!(request.salary, 95000.5);
        assert!(request.validate().is_ok());
    }
}
