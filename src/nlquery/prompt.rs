//! Prompt assembly for the SQL generation backend
//!
//! The schema block mirrors the tables created by `db::create_tables`.
//! The Users password column is deliberately not advertised to the model.

/// Tables and columns the gateway exposes to the generator
pub const SCHEMA_DESCRIPTION: &str = r#"- Users(User_Id, User_Name, E_mail, Role)
- Department(Dept_Id, Dept_Name)
- Grade(Grade_Id, Grade_Name, Basic_Salary, Grade_Bonus)
- Employee(Employee_Id, User_Id, Dept_Id, Grade_Id, Hire_Date)
- Salary(Salary_Id, Employee_Id, Salary, Salary_Date)"#;

/// Build the generation prompt for one natural-language request.
/// Leading and trailing whitespace on the request does not change the output.
pub fn build_prompt(request_text: &str) -> String {
    let request_text = request_text.trim();
    format!(
        "You are a PostgreSQL SQL query generator.\n\
         Given the following schema:\n\
         {}\n\
         \n\
         Convert the following natural language request into a valid SELECT SQL query.\n\
         Return **only the SQL**, no explanations or markdown formatting.\n\
         \n\
         Request: \"{}\"",
        SCHEMA_DESCRIPTION, request_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_schema_verbatim() {
        let prompt = build_prompt("list all employees");
        assert!(prompt.contains(SCHEMA_DESCRIPTION));
        assert!(prompt.contains("Salary(Salary_Id, Employee_Id, Salary, Salary_Date)"));
    }

    #[test]
    fn test_prompt_contains_request_verbatim() {
        let prompt = build_prompt("average salary per department");
        assert!(prompt.contains("Request: \"average salary per department\""));
    }

    #[test]
    fn test_prompt_does_not_advertise_password_column() {
        let prompt = build_prompt("show everything about users");
        assert!(!prompt.contains("Password"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt("employees hired after 2020");
        let b = build_prompt("employees hired after 2020");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_ignores_surrounding_whitespace() {
        let a = build_prompt("count employees per grade");
        let b = build_prompt("  count employees per grade \n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_asks_for_select_only() {
        let prompt = build_prompt("anything");
        assert!(prompt.contains("valid SELECT SQL query"));
        assert!(prompt.contains("Return **only the SQL**"));
    }
}
