//! Safety policy for generated statements
//!
//! The generator is untrusted input. Every statement must pass this
//! policy before it may touch the database: it must be a single SELECT
//! and must not contain any data-modifying keyword or server-side
//! escape construct as a standalone word. The scan treats string
//! literals and comments as ordinary text, which over-blocks a few
//! legitimate queries (`REPLACE(...)`, `FOR UPDATE`); that trade is
//! accepted.

use super::types::RejectReason;
use once_cell::sync::Lazy;
use regex::Regex;

/// Keywords that modify data or schema
const FORBIDDEN_KEYWORDS: [&str; 13] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "TRUNCATE",
    "GRANT", "REVOKE", "REPLACE", "CALL", "EXEC", "EXECUTE",
];

/// Constructs that reach server-side code, files or other sessions
const FORBIDDEN_CONSTRUCTS: [&str; 10] = [
    "DO", "COPY", "INTO", "PG_READ_FILE", "PG_READ_BINARY_FILE",
    "PG_LS_DIR", "LO_IMPORT", "LO_EXPORT", "DBLINK", "PG_SLEEP",
];

static SELECT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*SELECT\b").expect("select prefix pattern is valid")
});

static KEYWORD_SCAN: Lazy<Regex> = Lazy::new(|| word_pattern(&FORBIDDEN_KEYWORDS));

static CONSTRUCT_SCAN: Lazy<Regex> = Lazy::new(|| word_pattern(&FORBIDDEN_CONSTRUCTS));

fn word_pattern(words: &[&str]) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).expect("word pattern is valid")
}

/// Decide whether a statement is safe to execute.
///
/// Checks run in a fixed order: SELECT prefix, single statement,
/// forbidden keywords, forbidden constructs. The first failure wins.
/// A single trailing semicolon does not count as a second statement.
pub fn validate(sql: &str) -> Result<(), RejectReason> {
    if !SELECT_PREFIX.is_match(sql) {
        return Err(RejectReason::NotASelect);
    }

    let trimmed = sql.trim();
    let body = trimmed.strip_suffix(';').unwrap_or(trimmed);
    if body.contains(';') {
        return Err(RejectReason::MultipleStatements);
    }

    if let Some(found) = KEYWORD_SCAN.find(sql) {
        return Err(RejectReason::ForbiddenKeyword(found.as_str().to_uppercase()));
    }

    if let Some(found) = CONSTRUCT_SCAN.find(sql) {
        return Err(RejectReason::ForbiddenConstruct(found.as_str().to_uppercase()));
    }

    Ok(())
}

/// A statement that has passed the safety policy.
///
/// The only way to construct one is through [`ValidatedStatement::checked`],
/// so the executor can rely on the policy having run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStatement(String);

impl ValidatedStatement {
    /// Run the policy and normalize the statement text. A trailing
    /// semicolon is removed so the extended query protocol accepts it.
    pub fn checked(sql: &str) -> Result<Self, RejectReason> {
        validate(sql)?;
        let trimmed = sql.trim();
        let normalized = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
        Ok(Self(normalized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ValidatedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accepts_simple_select() {
        assert_eq!(
            validate("SELECT Employee_Id, Hire_Date FROM Employee WHERE Dept_Id = 3"),
            Ok(())
        );
    }

    #[test]
    fn test_accepts_lowercase_select() {
        assert_eq!(validate("select * from department"), Ok(()));
    }

    #[test]
    fn test_accepts_leading_whitespace() {
        assert_eq!(validate("   SELECT 1"), Ok(()));
    }

    #[test]
    fn test_accepts_single_trailing_semicolon() {
        assert_eq!(validate("SELECT * FROM Users;"), Ok(()));
    }

    #[test]
    fn test_accepts_joins_and_aggregates() {
        let sql = "SELECT d.Dept_Name, COUNT(*) FROM Employee e \
                   JOIN Department d ON d.Dept_Id = e.Dept_Id GROUP BY d.Dept_Name";
        assert_eq!(validate(sql), Ok(()));
    }

    #[test]
    fn test_accepts_subqueries() {
        let sql = "SELECT * FROM Employee WHERE Grade_Id IN \
                   (SELECT Grade_Id FROM Grade WHERE Basic_Salary > 50000)";
        assert_eq!(validate(sql), Ok(()));
    }

    #[test]
    fn test_accepts_union_of_selects() {
        let sql = "SELECT User_Name FROM Users UNION SELECT Dept_Name FROM Department";
        assert_eq!(validate(sql), Ok(()));
    }

    #[test]
    fn test_keyword_substrings_in_identifiers_are_fine() {
        assert_eq!(validate("SELECT created_at, updated_by FROM audit_log"), Ok(()));
        assert_eq!(validate("SELECT copy0, dointo FROM staging"), Ok(()));
        assert_eq!(validate("SELECT dropped FROM backlog"), Ok(()));
    }

    #[test]
    fn test_rejects_update_statement() {
        assert_eq!(
            validate("UPDATE Salary SET Salary = Salary * 2"),
            Err(RejectReason::NotASelect)
        );
    }

    #[test]
    fn test_rejects_delete_statement() {
        assert_eq!(
            validate("DELETE FROM Employee WHERE Dept_Id = 2"),
            Err(RejectReason::NotASelect)
        );
    }

    #[test]
    fn test_rejects_empty_text() {
        assert_eq!(validate(""), Err(RejectReason::NotASelect));
        assert_eq!(validate("   "), Err(RejectReason::NotASelect));
    }

    #[test]
    fn test_select_must_be_a_whole_word() {
        assert_eq!(
            validate("SELECTION history FROM archive"),
            Err(RejectReason::NotASelect)
        );
    }

    #[test]
    fn test_rejects_stacked_statements() {
        assert_eq!(
            validate("SELECT * FROM Employee; DROP TABLE Employee;"),
            Err(RejectReason::MultipleStatements)
        );
    }

    #[test]
    fn test_semicolon_check_runs_before_keyword_scan() {
        // The stacked DROP never gets reported; the split comes first.
        assert_eq!(
            validate("SELECT 1; DROP TABLE Users"),
            Err(RejectReason::MultipleStatements)
        );
    }

    #[test]
    fn test_rejects_double_trailing_semicolons() {
        assert_eq!(
            validate("SELECT 1;;"),
            Err(RejectReason::MultipleStatements)
        );
    }

    #[test]
    fn test_rejects_every_forbidden_keyword() {
        for keyword in FORBIDDEN_KEYWORDS {
            let sql = format!("SELECT 1 -- {}", keyword);
            assert_eq!(
                validate(&sql),
                Err(RejectReason::ForbiddenKeyword(keyword.to_string())),
                "keyword {} slipped through",
                keyword
            );
        }
    }

    #[test]
    fn test_rejects_every_forbidden_construct() {
        for construct in FORBIDDEN_CONSTRUCTS {
            let sql = format!("SELECT 1 -- {}", construct);
            assert_eq!(
                validate(&sql),
                Err(RejectReason::ForbiddenConstruct(construct.to_string())),
                "construct {} slipped through",
                construct
            );
        }
    }

    #[test]
    fn test_keyword_inside_string_literal_still_rejects() {
        assert_eq!(
            validate("SELECT * FROM Users WHERE User_Name = 'please DELETE me'"),
            Err(RejectReason::ForbiddenKeyword("DELETE".to_string()))
        );
    }

    #[test]
    fn test_keyword_inside_comment_still_rejects() {
        assert_eq!(
            validate("SELECT 1 /* DROP TABLE Users */"),
            Err(RejectReason::ForbiddenKeyword("DROP".to_string()))
        );
    }

    #[test]
    fn test_keyword_case_is_irrelevant() {
        assert_eq!(
            validate("SELECT 1 -- tRuNcAtE"),
            Err(RejectReason::ForbiddenKeyword("TRUNCATE".to_string()))
        );
    }

    #[test]
    fn test_replace_function_call_is_over_blocked() {
        assert_eq!(
            validate("SELECT REPLACE(User_Name, 'a', 'b') FROM Users"),
            Err(RejectReason::ForbiddenKeyword("REPLACE".to_string()))
        );
    }

    #[test]
    fn test_for_update_clause_is_over_blocked() {
        assert_eq!(
            validate("SELECT * FROM Employee FOR UPDATE"),
            Err(RejectReason::ForbiddenKeyword("UPDATE".to_string()))
        );
    }

    #[test]
    fn test_rejects_select_into() {
        assert_eq!(
            validate("SELECT * INTO backup FROM Employee"),
            Err(RejectReason::ForbiddenConstruct("INTO".to_string()))
        );
    }

    #[test]
    fn test_rejects_file_access_functions() {
        assert_eq!(
            validate("SELECT pg_read_file('/etc/passwd')"),
            Err(RejectReason::ForbiddenConstruct("PG_READ_FILE".to_string()))
        );
        assert_eq!(
            validate("SELECT pg_sleep(10)"),
            Err(RejectReason::ForbiddenConstruct("PG_SLEEP".to_string()))
        );
    }

    #[test]
    fn test_checked_strips_trailing_semicolon() {
        let statement = ValidatedStatement::checked("SELECT * FROM Grade ;").unwrap();
        assert_eq!(statement.as_str(), "SELECT * FROM Grade");
    }

    #[test]
    fn test_checked_keeps_clean_statement_intact() {
        let statement = ValidatedStatement::checked("SELECT 1").unwrap();
        assert_eq!(statement.as_str(), "SELECT 1");
        assert_eq!(statement.into_string(), "SELECT 1".to_string());
    }

    #[test]
    fn test_checked_refuses_what_validate_refuses() {
        assert_eq!(
            ValidatedStatement::checked("DROP TABLE Employee"),
            Err(RejectReason::NotASelect)
        );
    }
}
