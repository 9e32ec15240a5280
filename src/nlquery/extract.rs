//! Statement extraction from raw candidate text
//!
//! Generation backends wrap SQL in markdown fences more often than not,
//! even when asked not to. Cleanup removes every fence marker, flattens
//! newlines to spaces and trims the remainder.

use super::types::GatewayError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence with the sql language tag, any casing
static SQL_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```sql").expect("sql fence pattern is valid")
});

/// Strip fence markers and flatten the candidate into a single-line statement.
/// Returns `NoStatementExtracted` when nothing remains after cleanup.
pub fn extract_statement(candidate: &str) -> Result<String, GatewayError> {
    let without_fences = SQL_FENCE.replace_all(candidate, "").replace("```", "");
    let flattened: String = without_fences
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let sql = flattened.trim().to_string();

    if sql.is_empty() {
        return Err(GatewayError::NoStatementExtracted);
    }
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_statement_passes_through() {
        let sql = extract_statement("SELECT * FROM Employee").unwrap();
        assert_eq!(sql, "SELECT * FROM Employee");
    }

    #[test]
    fn test_strips_sql_fence() {
        let sql = extract_statement("```sql\nSELECT * FROM Department\n```").unwrap();
        assert_eq!(sql, "SELECT * FROM Department");
    }

    #[test]
    fn test_strips_uppercase_fence_tag() {
        let sql = extract_statement("```SQL\nSELECT 1\n```").unwrap();
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn test_strips_untagged_fence() {
        let sql = extract_statement("```\nSELECT Dept_Name FROM Department\n```").unwrap();
        assert_eq!(sql, "SELECT Dept_Name FROM Department");
    }

    #[test]
    fn test_flattens_multiline_statement() {
        let candidate = "SELECT e.Employee_Id,\n       u.User_Name\nFROM Employee e\nJOIN Users u ON u.User_Id = e.User_Id";
        let sql = extract_statement(candidate).unwrap();
        assert!(!sql.contains('\n'));
        assert!(sql.starts_with("SELECT e.Employee_Id,"));
        assert!(sql.ends_with("ON u.User_Id = e.User_Id"));
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let sql = extract_statement("  \nSELECT 1\n  ").unwrap();
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn test_empty_candidate_is_an_error() {
        assert!(matches!(
            extract_statement(""),
            Err(GatewayError::NoStatementExtracted)
        ));
    }

    #[test]
    fn test_fence_only_candidate_is_an_error() {
        assert!(matches!(
            extract_statement("```sql\n```"),
            Err(GatewayError::NoStatementExtracted)
        ));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let once = extract_statement("```sql\nSELECT * FROM Grade\n```").unwrap();
        let twice = extract_statement(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_windows_newlines_are_flattened() {
        let sql = extract_statement("SELECT 1\r\nFROM Department").unwrap();
        assert_eq!(sql, "SELECT 1  FROM Department");
    }
}
